//! Subscription handlers.
//!
//! One handler per use case. Each runs a single linear pipeline over the
//! `SubscriptionRepository` port and returns domain errors unmodified; no
//! handler retries.
//!
//! ## Commands
//! - Creating subscriptions
//! - Updating subscriptions (full replacement of mutable fields)
//! - Deleting subscriptions
//!
//! ## Queries
//! - Get one subscription
//! - List subscriptions (paged, newest first)
//! - Summarize spend over a date window

mod create_subscription;
mod delete_subscription;
mod get_subscription;
mod list_subscriptions;
mod summarize_spend;
mod update_subscription;

use tracing::{error, warn};

use crate::domain::subscription::SubscriptionError;

// Commands
pub use create_subscription::{
    CreateSubscriptionCommand, CreateSubscriptionHandler, CreateSubscriptionResult,
};
pub use delete_subscription::{
    DeleteSubscriptionCommand, DeleteSubscriptionHandler, DeleteSubscriptionResult,
};
pub use update_subscription::{
    UpdateSubscriptionCommand, UpdateSubscriptionHandler, UpdateSubscriptionResult,
};

// Queries
pub use get_subscription::{GetSubscriptionHandler, GetSubscriptionQuery, GetSubscriptionResult};
pub use list_subscriptions::{
    ListSubscriptionsHandler, ListSubscriptionsQuery, ListSubscriptionsResult,
};
pub use summarize_spend::{SummarizeSpendHandler, SummarizeSpendQuery, SummarizeSpendResult};

/// Logs a failed use case at a level matching who is at fault.
fn log_failure(operation: &'static str, err: &SubscriptionError) {
    match err {
        SubscriptionError::NotFound
        | SubscriptionError::Duplicate
        | SubscriptionError::InvalidPeriodFormat { .. } => {
            warn!(operation, code = %err.code(), error = %err, "Subscription request rejected");
        }
        SubscriptionError::MissingRequiredField(_) | SubscriptionError::StorageFailure(_) => {
            error!(operation, code = %err.code(), error = %err, "Subscription request failed");
        }
    }
}
