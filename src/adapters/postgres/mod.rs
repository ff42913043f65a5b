//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! This module provides adapters for PostgreSQL-backed persistence:
//! - `PostgresSubscriptionRepository` - Subscription storage and spend sums
//! - `connect` / `run_migrations` - Pool setup and schema management

mod error_translation;
mod pool;
mod subscription_repository;

pub use error_translation::{classify, classify_sqlstate, translate};
pub use pool::{connect, run_migrations};
pub use subscription_repository::PostgresSubscriptionRepository;
