//! Configuration types.
//!
//! All process-wide configuration is read once at startup and injected as
//! immutable values into the dispatcher and audit sink.

use crate::error::ConfigError;

/// Default region used for queue-url lookups when none is configured.
const DEFAULT_REGION: &str = "us-east-1";

/// Default cache instance prefix for endpoint cache keys.
const DEFAULT_CACHE_INSTANCE: &str = "emailchecker";

/// Skill configuration.
#[derive(Debug, Clone)]
pub struct SkillConfig {
    /// Root URL for card/display images. Must be non-blank.
    pub image_root_path: String,
    /// Audit queue configuration.
    pub queue: QueueConfig,
    /// Address the HTTP host binds to.
    pub bind_addr: String,
}

/// Audit queue configuration.
#[derive(Debug, Clone)]
pub struct QueueConfig {
    /// Logical queue name, resolved to a URL on first use.
    pub queue_name: Option<String>,
    /// Fully-qualified queue URL. When set, no lookup is performed.
    pub queue_url: Option<String>,
    /// Region the queue lives in.
    pub region: String,
    /// Endpoint cache instance name, used as a key prefix.
    pub cache_instance: String,
    /// Override for the queue service endpoint (local stacks). When unset the
    /// endpoint is derived from the region.
    pub service_endpoint: Option<String>,
}

impl QueueConfig {
    /// Validate that the queue is addressable at all.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if is_blank(self.queue_name.as_deref()) && is_blank(self.queue_url.as_deref()) {
            return Err(ConfigError::MissingRequired {
                key: "EMAIL_SKILL_QUEUE_NAME".into(),
                hint: "Set either EMAIL_SKILL_QUEUE_NAME or EMAIL_SKILL_QUEUE_URL".into(),
            });
        }
        Ok(())
    }

    /// The cache key under which this queue's resolved URL is stored.
    pub fn cache_key(&self) -> String {
        format!(
            "queueurl:{}:{}",
            self.cache_instance,
            self.queue_name.as_deref().unwrap_or_default()
        )
    }
}

impl SkillConfig {
    /// Build the configuration from `EMAIL_SKILL_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let image_root_path =
            env_nonblank("EMAIL_SKILL_IMAGE_ROOT").ok_or_else(|| ConfigError::MissingRequired {
                key: "EMAIL_SKILL_IMAGE_ROOT".into(),
                hint: "Set the root URL the skill's card and display images are served from".into(),
            })?;

        let config = Self {
            image_root_path,
            queue: QueueConfig {
                queue_name: env_nonblank("EMAIL_SKILL_QUEUE_NAME"),
                queue_url: env_nonblank("EMAIL_SKILL_QUEUE_URL"),
                region: env_nonblank("EMAIL_SKILL_AWS_REGION")
                    .unwrap_or_else(|| DEFAULT_REGION.to_string()),
                cache_instance: env_nonblank("EMAIL_SKILL_CACHE_INSTANCE")
                    .unwrap_or_else(|| DEFAULT_CACHE_INSTANCE.to_string()),
                service_endpoint: env_nonblank("EMAIL_SKILL_QUEUE_ENDPOINT"),
            },
            bind_addr: env_nonblank("EMAIL_SKILL_BIND_ADDR")
                .unwrap_or_else(|| "0.0.0.0:8080".to_string()),
        };

        config.queue.validate()?;
        Ok(config)
    }
}

fn env_nonblank(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn is_blank(value: Option<&str>) -> bool {
    value.map(|v| v.trim().is_empty()).unwrap_or(true)
}
