//! Subscription Repository Port - Persistence and spend aggregation.
//!
//! One capability set covers the whole lifecycle: point writes and reads,
//! paging and the spend sum. A PostgreSQL adapter implements it for
//! production and an in-memory adapter implements it for tests.
//!
//! # Example
//!
//! ```ignore
//! use async_trait::async_trait;
//! use subscriptions_api::ports::SubscriptionRepository;
//!
//! struct PostgresSubscriptionRepository { /* ... */ }
//!
//! #[async_trait]
//! impl SubscriptionRepository for PostgresSubscriptionRepository {
//!     async fn insert(&self, subscription: &Subscription) -> Result<SubscriptionId, SubscriptionError> {
//!         // INSERT INTO subscriptions ...
//!     }
//!     // ... other methods
//! }
//! ```

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::foundation::{SubscriptionId, UserId};
use crate::domain::subscription::{Subscription, SubscriptionError};

/// Page size used when a caller passes a non-positive limit.
pub const DEFAULT_PAGE_LIMIT: i64 = 10;

/// Port for subscription persistence.
///
/// All failures are already translated into `SubscriptionError`; no
/// driver-specific code escapes an implementation.
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// Persist a new subscription.
    ///
    /// Assigns an id when `subscription.id` is nil and stamps
    /// `created_at = updated_at = now`.
    ///
    /// # Errors
    ///
    /// - `Duplicate` if `(user_id, service)` is taken
    /// - `MissingRequiredField` if a required column is null
    /// - `StorageFailure` on any other error
    async fn insert(&self, subscription: &Subscription) -> Result<SubscriptionId, SubscriptionError>;

    /// Fetch one subscription.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no row has this id
    async fn get_by_id(&self, id: &SubscriptionId) -> Result<Subscription, SubscriptionError>;

    /// One page of subscriptions, newest `created_at` first.
    ///
    /// The page is normalized with [`PageRequest::normalized`] before use.
    async fn list(&self, page: PageRequest) -> Result<Vec<Subscription>, SubscriptionError>;

    /// Replace `service`, `price`, `start_date` and `end_date` by id and
    /// stamp `updated_at = now`.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no row was affected
    /// - `Duplicate` / `MissingRequiredField` on constraint violations
    async fn update(&self, subscription: &Subscription) -> Result<(), SubscriptionError>;

    /// Remove a subscription.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no row was affected
    async fn delete(&self, id: &SubscriptionId) -> Result<(), SubscriptionError>;

    /// Total price of every subscription matching `query`.
    ///
    /// Yields `0` when nothing matches.
    async fn sum(&self, query: &SpendQuery) -> Result<i64, SubscriptionError>;
}

/// Limit/offset paging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub limit: i64,
    pub offset: i64,
}

impl PageRequest {
    pub fn new(limit: i64, offset: i64) -> Self {
        Self { limit, offset }
    }

    /// Clamps a non-positive limit to [`DEFAULT_PAGE_LIMIT`] and a negative
    /// offset to zero.
    pub fn normalized(self) -> Self {
        Self {
            limit: if self.limit <= 0 { DEFAULT_PAGE_LIMIT } else { self.limit },
            offset: self.offset.max(0),
        }
    }
}

/// Closed calendar-day window `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Filters for the spend sum.
///
/// A subscription matches when its `start_date` lies inside `window` and it
/// satisfies every filter that is present. Overlap of the billing period
/// with the window is not considered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpendQuery {
    pub window: DateWindow,
    pub user_id: Option<UserId>,
    pub service: Option<String>,
}

impl SpendQuery {
    /// Query over `window` with no user or service restriction.
    pub fn within(window: DateWindow) -> Self {
        Self {
            window,
            user_id: None,
            service: None,
        }
    }

    pub fn for_user(mut self, user_id: UserId) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn for_service(mut self, service: impl Into<String>) -> Self {
        self.service = Some(service.into());
        self
    }

    /// Applies the filter predicate to a single record.
    pub fn matches(&self, subscription: &Subscription) -> bool {
        subscription.starts_within(self.window.start, self.window.end)
            && self.user_id.map_or(true, |id| subscription.user_id == id)
            && self
                .service
                .as_deref()
                .map_or(true, |service| subscription.service == service)
    }
}
