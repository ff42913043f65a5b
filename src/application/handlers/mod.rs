//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod subscription;

pub use subscription::{
    // Commands
    CreateSubscriptionCommand, CreateSubscriptionHandler, CreateSubscriptionResult,
    DeleteSubscriptionCommand, DeleteSubscriptionHandler, DeleteSubscriptionResult,
    UpdateSubscriptionCommand, UpdateSubscriptionHandler, UpdateSubscriptionResult,
    // Queries
    GetSubscriptionHandler, GetSubscriptionQuery, GetSubscriptionResult,
    ListSubscriptionsHandler, ListSubscriptionsQuery, ListSubscriptionsResult,
    SummarizeSpendHandler, SummarizeSpendQuery, SummarizeSpendResult,
};
