//! Classification of sqlx errors into storage signals.

use sqlx::postgres::PgDatabaseError;

use crate::domain::subscription::{StorageSignal, SubscriptionError};

/// SQLSTATE for `unique_violation`.
pub const UNIQUE_VIOLATION: &str = "23505";

/// SQLSTATE for `not_null_violation`.
pub const NOT_NULL_VIOLATION: &str = "23502";

/// Classifies a sqlx error.
pub fn classify(err: &sqlx::Error) -> StorageSignal {
    match err {
        sqlx::Error::RowNotFound => StorageSignal::NoRows,
        sqlx::Error::Database(db_err) => {
            let column = db_err
                .try_downcast_ref::<PgDatabaseError>()
                .and_then(|pg| pg.column());
            classify_sqlstate(db_err.code().as_deref(), column, &err.to_string())
        }
        other => StorageSignal::Other(other.to_string()),
    }
}

/// Classifies a database error by its SQLSTATE code.
pub fn classify_sqlstate(code: Option<&str>, column: Option<&str>, detail: &str) -> StorageSignal {
    match code {
        Some(UNIQUE_VIOLATION) => StorageSignal::UniqueViolation,
        Some(NOT_NULL_VIOLATION) => StorageSignal::NotNullViolation {
            column: column.map(str::to_string),
        },
        _ => StorageSignal::Other(detail.to_string()),
    }
}

/// Translates a sqlx error straight into the subscription error taxonomy.
pub fn translate(err: sqlx::Error) -> SubscriptionError {
    classify(&err).into()
}
