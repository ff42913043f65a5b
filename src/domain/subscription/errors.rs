//! Subscription-specific error types.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | InvalidPeriodFormat | 400 |
//! | MissingRequiredField | 400 |
//! | NotFound | 404 |
//! | Duplicate | 409 |
//! | StorageFailure | 500 |

use crate::domain::foundation::ErrorCode;

use super::PeriodError;

/// Failures surfaced by subscription operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscriptionError {
    /// A `start_date`/`end_date` value is not `MM-YYYY`.
    InvalidPeriodFormat { field: String, value: String },

    /// A subscription for this user and service already exists.
    Duplicate,

    /// No subscription matches the requested identifier.
    NotFound,

    /// Storage rejected a record because a required column was empty.
    MissingRequiredField(String),

    /// Any other storage failure. Carries the underlying description.
    StorageFailure(String),
}

impl SubscriptionError {
    pub fn invalid_period(field: impl Into<String>, err: PeriodError) -> Self {
        SubscriptionError::InvalidPeriodFormat {
            field: field.into(),
            value: err.value().to_string(),
        }
    }

    pub fn missing_required_field(field: impl Into<String>) -> Self {
        SubscriptionError::MissingRequiredField(field.into())
    }

    pub fn storage(message: impl Into<String>) -> Self {
        SubscriptionError::StorageFailure(message.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            SubscriptionError::InvalidPeriodFormat { .. } => ErrorCode::InvalidPeriodFormat,
            SubscriptionError::Duplicate => ErrorCode::SubscriptionExists,
            SubscriptionError::NotFound => ErrorCode::SubscriptionNotFound,
            SubscriptionError::MissingRequiredField(_) => ErrorCode::MissingRequiredField,
            SubscriptionError::StorageFailure(_) => ErrorCode::DatabaseError,
        }
    }

    /// Returns a client-facing error message.
    ///
    /// Storage failures are reported generically; the underlying description
    /// is only logged.
    pub fn message(&self) -> String {
        match self {
            SubscriptionError::InvalidPeriodFormat { field, value } => {
                format!("invalid {}: '{}' is not in MM-YYYY format", field, value)
            }
            SubscriptionError::Duplicate => {
                "subscription already exists for this user and service".to_string()
            }
            SubscriptionError::NotFound => "subscription not found".to_string(),
            SubscriptionError::MissingRequiredField(field) => {
                format!("missing required field: {}", field)
            }
            SubscriptionError::StorageFailure(_) => "internal server error".to_string(),
        }
    }
}

impl std::fmt::Display for SubscriptionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubscriptionError::StorageFailure(detail) => write!(f, "storage failure: {}", detail),
            _ => write!(f, "{}", self.message()),
        }
    }
}

impl std::error::Error for SubscriptionError {}
