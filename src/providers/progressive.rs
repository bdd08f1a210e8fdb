//! Progressive-response notifier — sends an early spoken acknowledgment while
//! the full response is being prepared. Strictly fire-and-forget.

use async_trait::async_trait;
use serde_json::json;

use crate::protocol::InboundRequest;

/// Directives API path.
const DIRECTIVES_PATH: &str = "/v1/directives";

/// Sends an early-acknowledgment notification back to the caller.
#[async_trait]
pub trait ProgressiveNotifier: Send + Sync {
    /// Failures are returned so the dispatcher can log them, but they must
    /// never affect the primary response.
    async fn notify(&self, request: &InboundRequest, text: &str) -> Result<(), String>;
}

/// HTTP implementation backed by the platform directives API.
pub struct HttpProgressiveNotifier {
    client: reqwest::Client,
}

impl HttpProgressiveNotifier {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ProgressiveNotifier for HttpProgressiveNotifier {
    async fn notify(&self, request: &InboundRequest, text: &str) -> Result<(), String> {
        let system = request
            .system()
            .ok_or_else(|| "request has no authorization context".to_string())?;
        let endpoint = system
            .api_endpoint
            .as_deref()
            .ok_or_else(|| "request has no api endpoint".to_string())?;
        let token = system
            .api_access_token
            .as_deref()
            .ok_or_else(|| "request has no api access token".to_string())?;
        let request_id = request
            .request
            .as_ref()
            .and_then(|r| r.request_id.as_deref())
            .ok_or_else(|| "request has no request id".to_string())?;

        let body = json!({
            "header": {"requestId": request_id},
            "directive": {"type": "VoicePlayer.Speak", "speech": text},
        });

        let url = format!("{}{}", endpoint.trim_end_matches('/'), DIRECTIVES_PATH);
        let resp = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .map_err(|e| format!("progressive response request failed: {e}"))?;

        if !resp.status().is_success() {
            return Err(format!(
                "progressive response returned status {}",
                resp.status()
            ));
        }
        Ok(())
    }
}
