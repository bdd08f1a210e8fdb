//! Endpoint cache — logical queue name to resolved address, with sliding
//! expiration so restarts within the window skip the remote lookup.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::CacheError;

/// Key-value store for resolved endpoint addresses.
#[async_trait]
pub trait EndpointCache: Send + Sync {
    /// Look up a non-expired entry. Reads refresh the sliding window.
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Store an entry with a sliding expiration window.
    async fn set(&self, key: &str, value: &str, sliding: Duration) -> Result<(), CacheError>;
}

struct CacheEntry {
    value: String,
    expires_at: Instant,
    sliding: Duration,
}

/// In-memory cache, used when no external cache backend is configured.
#[derive(Default)]
pub struct MemoryEndpointCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl MemoryEndpointCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EndpointCache for MemoryEndpointCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut entries = self.entries.lock().await;
        let now = Instant::now();
        match entries.get_mut(key) {
            Some(entry) if entry.expires_at > now => {
                entry.expires_at = now + entry.sliding;
                Ok(Some(entry.value.clone()))
            }
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &str, sliding: Duration) -> Result<(), CacheError> {
        let mut entries = self.entries.lock().await;
        entries.insert(
            key.to_string(),
            CacheEntry {
                value: value.to_string(),
                expires_at: Instant::now() + sliding,
                sliding,
            },
        );
        Ok(())
    }
}
