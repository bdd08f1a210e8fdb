//! Audit sink — serializes records and delivers them to the remote queue,
//! resolving the queue address at most once per process lifetime.
//!
//! Resolution order: direct config URL, then the endpoint cache, then a
//! remote lookup by logical name (cached on success). Concurrent first
//! callers share one in-flight resolution future; no lock is held across the
//! lookup I/O, and a failed resolution is never memoized.

use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::audit::cache::EndpointCache;
use crate::audit::queue::QueueClient;
use crate::audit::record::AuditRecord;
use crate::config::QueueConfig;
use crate::error::{AuditError, ConfigError, QueueError};

/// Sliding expiration for cached queue URLs.
const QUEUE_URL_CACHE_SLIDING: Duration = Duration::from_secs(2 * 60 * 60);

type ResolveResult = Result<String, Arc<QueueError>>;
type ResolveFuture = Shared<BoxFuture<'static, ResolveResult>>;

/// How the queue is addressed.
#[derive(Debug, Clone)]
enum QueueIdentity {
    /// Fully-qualified URL from configuration; no lookup needed.
    Url(String),
    /// Logical name, resolved via cache or remote lookup.
    Name(String),
}

/// Memoization cell for the resolved queue URL.
enum EndpointState {
    Unresolved,
    InFlight(ResolveFuture),
    Resolved(String),
}

/// Delivers audit records to the remote queue.
pub struct AuditSink {
    identity: QueueIdentity,
    cache_key: String,
    queue: Arc<dyn QueueClient>,
    cache: Arc<dyn EndpointCache>,
    endpoint: Mutex<EndpointState>,
}

impl AuditSink {
    pub fn new(
        config: &QueueConfig,
        queue: Arc<dyn QueueClient>,
        cache: Arc<dyn EndpointCache>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let identity = match (&config.queue_url, &config.queue_name) {
            (Some(url), _) => QueueIdentity::Url(url.clone()),
            (None, Some(name)) => QueueIdentity::Name(name.clone()),
            (None, None) => unreachable!("validated above"),
        };
        Ok(Self {
            identity,
            cache_key: config.cache_key(),
            queue,
            cache,
            endpoint: Mutex::new(EndpointState::Unresolved),
        })
    }

    /// Serialize and deliver one audit record. At most one delivery attempt;
    /// failures carry the destination and payload for diagnosis.
    pub async fn send(&self, record: AuditRecord) -> Result<(), AuditError> {
        let payload = serde_json::to_string(&record)?;
        let queue_url = self.queue_url().await.map_err(AuditError::Resolve)?;

        self.queue
            .send(&queue_url, &payload)
            .await
            .map_err(|source| AuditError::Deliver {
                destination: queue_url.clone(),
                payload,
                source,
            })?;

        debug!(
            session_id = %record.session_id,
            request_id = record.request_id.as_deref().unwrap_or_default(),
            "Audit record delivered"
        );
        Ok(())
    }

    /// The memoized queue URL, resolving it on first use.
    async fn queue_url(&self) -> ResolveResult {
        let fut = {
            let mut state = self.endpoint.lock().await;
            match &*state {
                EndpointState::Resolved(url) => return Ok(url.clone()),
                EndpointState::InFlight(fut) => fut.clone(),
                EndpointState::Unresolved => {
                    let fut = resolve_once(
                        self.identity.clone(),
                        self.cache_key.clone(),
                        Arc::clone(&self.queue),
                        Arc::clone(&self.cache),
                    )
                    .boxed()
                    .shared();
                    *state = EndpointState::InFlight(fut.clone());
                    fut
                }
            }
        };

        let result = fut.await;

        // Memoize success; reset on failure so the next call retries from
        // scratch.
        let mut state = self.endpoint.lock().await;
        if let EndpointState::InFlight(_) = &*state {
            *state = match &result {
                Ok(url) => EndpointState::Resolved(url.clone()),
                Err(_) => EndpointState::Unresolved,
            };
        }
        result
    }
}

/// One resolution attempt: config URL, cache, then remote lookup.
async fn resolve_once(
    identity: QueueIdentity,
    cache_key: String,
    queue: Arc<dyn QueueClient>,
    cache: Arc<dyn EndpointCache>,
) -> ResolveResult {
    let name = match identity {
        QueueIdentity::Url(url) => return Ok(url),
        QueueIdentity::Name(name) => name,
    };

    // Cache unavailability is non-fatal; fall through to the lookup.
    match cache.get(&cache_key).await {
        Ok(Some(url)) => {
            debug!(queue_name = %name, "Queue url found in endpoint cache");
            return Ok(url);
        }
        Ok(None) => {}
        Err(e) => warn!(error = %e, "Endpoint cache read failed; falling back to remote lookup"),
    }

    let url = queue.resolve_queue_url(&name).await.map_err(Arc::new)?;
    info!(queue_name = %name, queue_url = %url, "Queue name resolved to queue url");

    if let Err(e) = cache.set(&cache_key, &url, QUEUE_URL_CACHE_SLIDING).await {
        warn!(error = %e, "Endpoint cache write failed");
    }

    Ok(url)
}
