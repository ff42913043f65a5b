//! Subscription aggregate entity.
//!
//! A Subscription records that a user pays a monthly price for a named
//! service over a billing period.
//!
//! # Design Decisions
//!
//! - **One per user and service**: Uniqueness of `(user_id, service)` is
//!   enforced by storage and surfaces as `SubscriptionError::Duplicate`
//! - **Whole-unit prices**: Prices are positive integers, never floats
//! - **Materialized end**: `end_date` is always stored, defaulting to the
//!   last day of the start month

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{SubscriptionId, Timestamp, UserId};

use super::{BillingPeriod, Price};

/// Subscription aggregate.
///
/// # Invariants
///
/// - `start_date` is the first day of a month
/// - `end_date` is the last day of a month
/// - `service` is non-empty
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    /// Unique identifier. Nil until storage assigns one.
    pub id: SubscriptionId,

    /// User who pays for the service.
    pub user_id: UserId,

    /// Free-form service name, e.g. "Yandex Plus".
    pub service: String,

    /// Monthly price.
    pub price: Price,

    /// First day of the first billed month.
    pub start_date: NaiveDate,

    /// Last day of the last billed month.
    pub end_date: NaiveDate,

    /// When the record was created.
    pub created_at: Timestamp,

    /// When the record was last updated.
    pub updated_at: Timestamp,
}

impl Subscription {
    /// Creates a not-yet-persisted subscription.
    ///
    /// The id is left nil so that storage assigns it on insert.
    pub fn create(
        user_id: UserId,
        service: impl Into<String>,
        price: Price,
        period: BillingPeriod,
    ) -> Self {
        let now = Timestamp::now();
        Self {
            id: SubscriptionId::nil(),
            user_id,
            service: service.into(),
            price,
            start_date: period.start_date,
            end_date: period.end_date,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replaces every mutable field and bumps `updated_at`.
    ///
    /// `id`, `user_id` and `created_at` are kept.
    pub fn revise(&mut self, service: impl Into<String>, price: Price, period: BillingPeriod) {
        self.service = service.into();
        self.price = price;
        self.start_date = period.start_date;
        self.end_date = period.end_date;
        self.updated_at = Timestamp::now();
    }

    /// The billing period as a pair.
    pub fn period(&self) -> BillingPeriod {
        BillingPeriod {
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }

    /// True if the subscription starts inside the closed window
    /// `[from, to]`. This is the membership test used for spend totals.
    pub fn starts_within(&self, from: NaiveDate, to: NaiveDate) -> bool {
        self.start_date >= from && self.start_date <= to
    }
}
