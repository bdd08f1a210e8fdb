//! Queue client — resolves logical queue names and delivers opaque payloads.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::config::QueueConfig;
use crate::error::QueueError;

/// Error code the queue service returns for an unknown logical name.
const NON_EXISTENT_QUEUE: &str = "NonExistentQueue";

/// Sends messages to a remote queue and resolves logical names to addresses.
#[async_trait]
pub trait QueueClient: Send + Sync {
    /// Resolve a logical queue name to its URL. Fails with
    /// [`QueueError::DoesNotExist`] when the remote system confirms the name
    /// is unknown.
    async fn resolve_queue_url(&self, name: &str) -> Result<String, QueueError>;

    /// Send a single opaque payload to a resolved queue URL.
    async fn send(&self, queue_url: &str, payload: &str) -> Result<(), QueueError>;
}

#[derive(Deserialize)]
struct GetQueueUrlResponse {
    #[serde(rename = "QueueUrl")]
    queue_url: String,
}

/// HTTP implementation speaking the queue service's JSON protocol.
pub struct HttpQueueClient {
    client: reqwest::Client,
    service_endpoint: String,
}

impl HttpQueueClient {
    /// Build a client from queue configuration. The service endpoint is
    /// derived from the region unless an explicit override is configured.
    pub fn new(client: reqwest::Client, config: &QueueConfig) -> Self {
        let service_endpoint = config
            .service_endpoint
            .clone()
            .unwrap_or_else(|| format!("https://sqs.{}.amazonaws.com", config.region));
        Self {
            client,
            service_endpoint,
        }
    }

    async fn post_action(
        &self,
        action: &str,
        body: serde_json::Value,
    ) -> Result<reqwest::Response, QueueError> {
        self.client
            .post(&self.service_endpoint)
            .header("X-Amz-Target", format!("AmazonSQS.{action}"))
            .header("Content-Type", "application/x-amz-json-1.0")
            .json(&body)
            .send()
            .await
            .map_err(|e| QueueError::Http(e.to_string()))
    }
}

#[async_trait]
impl QueueClient for HttpQueueClient {
    async fn resolve_queue_url(&self, name: &str) -> Result<String, QueueError> {
        let resp = self
            .post_action("GetQueueUrl", json!({"QueueName": name}))
            .await?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| QueueError::InvalidBody(e.to_string()))?;

        if !status.is_success() {
            if body.contains(NON_EXISTENT_QUEUE) {
                return Err(QueueError::DoesNotExist { name: name.into() });
            }
            return Err(QueueError::UnexpectedResponse {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GetQueueUrlResponse =
            serde_json::from_str(&body).map_err(|e| QueueError::InvalidBody(e.to_string()))?;
        Ok(parsed.queue_url)
    }

    async fn send(&self, queue_url: &str, payload: &str) -> Result<(), QueueError> {
        let resp = self
            .post_action(
                "SendMessage",
                json!({"QueueUrl": queue_url, "MessageBody": payload}),
            )
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(QueueError::UnexpectedResponse {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}
