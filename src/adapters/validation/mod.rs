//! Validation Adapters - Request validation implementations.
//!
//! Contains the stateless validator that turns raw HTTP input into
//! application commands and queries.

mod request_validator;

pub use request_validator::{RequestValidator, ValidationErrors, DEFAULT_LIST_LIMIT};
