//! Translation of storage outcomes into the subscription error taxonomy.
//!
//! Storage adapters classify their driver errors into a [`StorageSignal`]
//! and hand it here, so the mapping to client-facing errors lives in one
//! place and does not depend on any particular database driver.

use super::SubscriptionError;

/// Storage-level outcome, independent of the driver that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageSignal {
    /// A uniqueness constraint rejected the write.
    UniqueViolation,

    /// A NOT NULL constraint rejected the write.
    NotNullViolation { column: Option<String> },

    /// A single-row lookup matched nothing.
    NoRows,

    /// Anything else, with the driver's description.
    Other(String),
}

impl From<StorageSignal> for SubscriptionError {
    fn from(signal: StorageSignal) -> Self {
        match signal {
            StorageSignal::UniqueViolation => SubscriptionError::Duplicate,
            StorageSignal::NotNullViolation { column } => SubscriptionError::MissingRequiredField(
                column.unwrap_or_else(|| "unknown".to_string()),
            ),
            StorageSignal::NoRows => SubscriptionError::NotFound,
            StorageSignal::Other(detail) => SubscriptionError::StorageFailure(detail),
        }
    }
}

/// Checks the affected-row count of an update or delete.
///
/// # Errors
///
/// `SubscriptionError::NotFound` when nothing was touched.
pub fn ensure_rows_affected(rows: u64) -> Result<(), SubscriptionError> {
    if rows == 0 {
        return Err(SubscriptionError::NotFound);
    }
    Ok(())
}
