//! HTTP adapters - REST API implementations.
//!
//! Each domain module has its own HTTP adapter for endpoint exposure.

pub mod subscription;

// Re-export key types for convenience
pub use subscription::{subscription_routes, SubscriptionHandlers};
