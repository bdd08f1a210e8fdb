//! Error types for the email skill backend.

use std::sync::Arc;

/// Top-level error type for the skill.
///
/// Only two classes cross the dispatcher boundary: caller-input errors
/// (`Request`) and fatal configuration defects (`Config`). Everything else is
/// absorbed and logged at the point it occurs.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Request error: {0}")]
    Request(#[from] RequestError),

    #[error("Audit error: {0}")]
    Audit(#[from] AuditError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required configuration: {key}. {hint}")]
    MissingRequired { key: String, hint: String },

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Caller-input errors — the inbound request is malformed.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("{field} in request is missing or empty")]
    MissingField { field: String },
}

impl RequestError {
    pub fn missing(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }
}

/// Queue client errors.
#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    /// The remote system confirmed the logical name does not exist. This is a
    /// deployment defect, never a transient condition.
    #[error("Url for queue name '{name}' not found")]
    DoesNotExist { name: String },

    #[error("Queue request failed: {0}")]
    Http(String),

    #[error("Unexpected response from queue service (status {status}): {body}")]
    UnexpectedResponse { status: u16, body: String },

    #[error("Queue service returned an unreadable body: {0}")]
    InvalidBody(String),
}

/// Endpoint cache errors. Always non-fatal to the caller.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache operation failed: {0}")]
    Operation(String),
}

/// Audit sink errors. Reported to the dispatcher, which logs and swallows.
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    #[error("Failed to resolve audit queue url: {0}")]
    Resolve(#[source] Arc<QueueError>),

    #[error("Error sending audit record to queue {destination}: {payload}")]
    Deliver {
        destination: String,
        payload: String,
        #[source]
        source: QueueError,
    },

    #[error("Failed to serialize audit record: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type alias for the skill.
pub type Result<T> = std::result::Result<T, Error>;
