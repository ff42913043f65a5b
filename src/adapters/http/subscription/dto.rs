//! HTTP DTOs for subscription endpoints.
//!
//! Request fields are optional strings and numbers so that a missing or
//! mistyped field becomes a field-level validation error rather than a
//! body rejection.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::subscription::Subscription;

/// Wire format for calendar dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Request to create a subscription.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateSubscriptionRequest {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default)]
    pub price: Option<i64>,
    /// `MM-YYYY`
    #[serde(default)]
    pub start_date: Option<String>,
    /// `MM-YYYY`; defaults to the start month.
    #[serde(default)]
    pub end_date: Option<String>,
}

/// Request to update a subscription. The owner cannot change.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSubscriptionRequest {
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default)]
    pub price: Option<i64>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

/// Query parameters for listing subscriptions.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListSubscriptionsParams {
    #[serde(default)]
    pub limit: Option<String>,
    #[serde(default)]
    pub offset: Option<String>,
}

/// Query parameters for the spend summary.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SummaryParams {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub service: Option<String>,
    /// `YYYY-MM-DD`
    #[serde(default)]
    pub start_date: Option<String>,
    /// `YYYY-MM-DD`
    #[serde(default)]
    pub end_date: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// A stored subscription.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionResponse {
    pub id: String,
    pub user_id: String,
    pub service: String,
    pub price: i32,
    pub start_date: String,
    pub end_date: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Subscription> for SubscriptionResponse {
    fn from(subscription: Subscription) -> Self {
        Self {
            id: subscription.id.to_string(),
            user_id: subscription.user_id.to_string(),
            service: subscription.service,
            price: subscription.price.value(),
            start_date: subscription.start_date.format(DATE_FORMAT).to_string(),
            end_date: subscription.end_date.format(DATE_FORMAT).to_string(),
            created_at: subscription.created_at.to_rfc3339(),
            updated_at: subscription.updated_at.to_rfc3339(),
        }
    }
}

/// Response to a successful create.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub id: String,
    pub message: String,
}

/// One page of subscriptions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionListResponse {
    pub subscriptions: Vec<SubscriptionResponse>,
    pub count: usize,
}

impl From<Vec<Subscription>> for SubscriptionListResponse {
    fn from(subscriptions: Vec<Subscription>) -> Self {
        let subscriptions: Vec<SubscriptionResponse> =
            subscriptions.into_iter().map(Into::into).collect();
        Self {
            count: subscriptions.len(),
            subscriptions,
        }
    }
}

/// Total spend.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub total: i64,
}

/// Confirmation for update and delete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Standard error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<BTreeMap<String, String>>,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: code.into(),
            fields: None,
        }
    }

    pub fn with_fields(
        code: impl Into<String>,
        error: impl Into<String>,
        fields: BTreeMap<String, String>,
    ) -> Self {
        Self {
            error: error.into(),
            code: code.into(),
            fields: Some(fields),
        }
    }

    pub fn bad_request(error: impl Into<String>) -> Self {
        Self::new("BAD_REQUEST", error)
    }
}
