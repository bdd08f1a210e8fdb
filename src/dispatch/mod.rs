//! Request classification and response construction.

mod processor;
pub mod render;

pub use processor::{RequestDispatcher, EMAIL_CHECK_INTENT};
