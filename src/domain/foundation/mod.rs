//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, timestamps and error vocabulary used by the
//! subscription domain and every layer above it.

mod errors;
mod ids;
mod timestamp;

pub use errors::{ErrorCode, ValidationError};
pub use ids::{SubscriptionId, UserId};
pub use timestamp::Timestamp;
