//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors)
//! - `subscription` - Subscription aggregate, billing periods and error taxonomy

pub mod foundation;
pub mod subscription;
