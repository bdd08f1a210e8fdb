//! External collaborators — attribute retrieval and early acknowledgment.

pub mod profile;
pub mod progressive;

pub use profile::{AttributeOutcome, AttributeProvider, HttpAttributeProvider};
pub use progressive::{HttpProgressiveNotifier, ProgressiveNotifier};
