//! Attribute provider — exchanges an authorization token for the user's
//! permitted email address via the platform's customer profile API.

use async_trait::async_trait;

/// Profile API path for the email setting.
const EMAIL_PROFILE_PATH: &str = "/v2/accounts/~current/settings/Profile.email";

/// Result of an attribute retrieval.
///
/// Permission-denied is an expected end-user state, not an error, so the
/// outcome is a tagged result rather than an error type — branching on it is
/// explicit and exhaustive.
#[derive(Debug, Clone)]
pub enum AttributeOutcome {
    /// Permission granted; carries the attribute value.
    Granted(String),
    /// The platform reported an authorization-denied status.
    Denied { status: u16 },
    /// Any other failure (transport, unexpected status, bad body).
    Failed { reason: String },
}

/// Retrieves a permission-gated user attribute.
#[async_trait]
pub trait AttributeProvider: Send + Sync {
    async fn get_attribute(&self, endpoint: &str, token: &str) -> AttributeOutcome;
}

/// HTTP implementation backed by the platform profile API.
pub struct HttpAttributeProvider {
    client: reqwest::Client,
}

impl HttpAttributeProvider {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AttributeProvider for HttpAttributeProvider {
    async fn get_attribute(&self, endpoint: &str, token: &str) -> AttributeOutcome {
        let url = format!("{}{}", endpoint.trim_end_matches('/'), EMAIL_PROFILE_PATH);

        let resp = match self.client.get(&url).bearer_auth(token).send().await {
            Ok(resp) => resp,
            Err(e) => {
                return AttributeOutcome::Failed {
                    reason: format!("profile request failed: {e}"),
                };
            }
        };

        let status = resp.status();
        if status == reqwest::StatusCode::FORBIDDEN {
            return AttributeOutcome::Denied {
                status: status.as_u16(),
            };
        }
        if !status.is_success() {
            return AttributeOutcome::Failed {
                reason: format!("profile request returned status {status}"),
            };
        }

        // The profile API returns the setting as a bare JSON string.
        match resp.json::<String>().await {
            Ok(email) => AttributeOutcome::Granted(email),
            Err(e) => AttributeOutcome::Failed {
                reason: format!("profile response was not a JSON string: {e}"),
            },
        }
    }
}
