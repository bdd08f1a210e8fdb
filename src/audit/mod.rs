//! Audit side-channel — a write-once summary of every handled request is
//! delivered to a remote queue, decoupled from the response path.

pub mod cache;
pub mod queue;
pub mod record;
pub mod sink;

pub use cache::{EndpointCache, MemoryEndpointCache};
pub use queue::{HttpQueueClient, QueueClient};
pub use record::{AuditRecord, AuditRequestType};
pub use sink::AuditSink;
