//! Email Skill — voice-assistant backend that reads a user's email address
//! back to them, gated on a profile permission, with an audit trail of every
//! handled request delivered to a remote queue.

pub mod audit;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod http;
pub mod protocol;
pub mod providers;
