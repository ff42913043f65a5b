//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `http` - axum REST endpoints
//! - `memory` - In-memory repository for tests and local runs
//! - `postgres` - PostgreSQL-backed repository
//! - `validation` - Transport input validation

pub mod http;
pub mod memory;
pub mod postgres;
pub mod validation;

pub use memory::InMemorySubscriptionRepository;
pub use postgres::PostgresSubscriptionRepository;
pub use validation::{RequestValidator, ValidationErrors};
