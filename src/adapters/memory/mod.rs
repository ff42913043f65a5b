//! In-memory adapters.
//!
//! - `InMemorySubscriptionRepository` - Process-local store for tests and demos

mod subscription_repository;

pub use subscription_repository::InMemorySubscriptionRepository;
