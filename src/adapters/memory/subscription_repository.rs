//! In-memory subscription repository for testing.
//!
//! Mirrors the observable behavior of the PostgreSQL adapter: the
//! `(user_id, service)` uniqueness constraint, page clamping, newest-first
//! ordering and start-date window sums.
//!
//! # Security Note
//!
//! This adapter is for **testing only** and should not be used in production.
//! It uses `.expect()` on lock operations which will panic if locks are poisoned.

use async_trait::async_trait;
use std::sync::RwLock;

use crate::domain::foundation::{SubscriptionId, Timestamp};
use crate::domain::subscription::{Subscription, SubscriptionError};
use crate::ports::{PageRequest, SpendQuery, SubscriptionRepository};

/// In-memory subscription store.
///
/// # Panics
///
/// Methods may panic if the internal lock is poisoned.
///
/// # Example
///
/// ```ignore
/// let repo = Arc::new(InMemorySubscriptionRepository::new());
/// let id = repo.insert(&subscription).await?;
/// assert_eq!(repo.len(), 1);
/// ```
pub struct InMemorySubscriptionRepository {
    // Insertion order; list() sorts a copy.
    subscriptions: RwLock<Vec<Subscription>>,
}

impl InMemorySubscriptionRepository {
    /// Creates a new empty repository.
    pub fn new() -> Self {
        Self {
            subscriptions: RwLock::new(Vec::new()),
        }
    }

    // === Test Helpers ===

    /// Number of stored subscriptions.
    pub fn len(&self) -> usize {
        self.subscriptions
            .read()
            .expect("InMemorySubscriptionRepository: lock poisoned")
            .len()
    }

    /// True when nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemorySubscriptionRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn conflicts(existing: &Subscription, candidate: &Subscription) -> bool {
    existing.id != candidate.id
        && existing.user_id == candidate.user_id
        && existing.service == candidate.service
}

#[async_trait]
impl SubscriptionRepository for InMemorySubscriptionRepository {
    async fn insert(&self, subscription: &Subscription) -> Result<SubscriptionId, SubscriptionError> {
        let mut subscriptions = self
            .subscriptions
            .write()
            .expect("InMemorySubscriptionRepository: write lock poisoned");

        let mut record = subscription.clone();
        if record.id.is_nil() {
            record.id = SubscriptionId::new();
        }
        if subscriptions
            .iter()
            .any(|s| s.id == record.id || conflicts(s, &record))
        {
            return Err(SubscriptionError::Duplicate);
        }

        let now = Timestamp::now();
        record.created_at = now;
        record.updated_at = now;

        let id = record.id;
        subscriptions.push(record);
        Ok(id)
    }

    async fn get_by_id(&self, id: &SubscriptionId) -> Result<Subscription, SubscriptionError> {
        self.subscriptions
            .read()
            .expect("InMemorySubscriptionRepository: lock poisoned")
            .iter()
            .find(|s| &s.id == id)
            .cloned()
            .ok_or(SubscriptionError::NotFound)
    }

    async fn list(&self, page: PageRequest) -> Result<Vec<Subscription>, SubscriptionError> {
        let page = page.normalized();
        let mut newest_first: Vec<Subscription> = self
            .subscriptions
            .read()
            .expect("InMemorySubscriptionRepository: lock poisoned")
            .iter()
            .rev()
            .cloned()
            .collect();
        newest_first.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(newest_first
            .into_iter()
            .skip(usize::try_from(page.offset).unwrap_or(usize::MAX))
            .take(usize::try_from(page.limit).unwrap_or(usize::MAX))
            .collect())
    }

    async fn update(&self, subscription: &Subscription) -> Result<(), SubscriptionError> {
        let mut subscriptions = self
            .subscriptions
            .write()
            .expect("InMemorySubscriptionRepository: write lock poisoned");

        if subscriptions.iter().any(|s| conflicts(s, subscription)) {
            return Err(SubscriptionError::Duplicate);
        }

        let stored = subscriptions
            .iter_mut()
            .find(|s| s.id == subscription.id)
            .ok_or(SubscriptionError::NotFound)?;
        stored.service = subscription.service.clone();
        stored.price = subscription.price;
        stored.start_date = subscription.start_date;
        stored.end_date = subscription.end_date;
        stored.updated_at = Timestamp::now();
        Ok(())
    }

    async fn delete(&self, id: &SubscriptionId) -> Result<(), SubscriptionError> {
        let mut subscriptions = self
            .subscriptions
            .write()
            .expect("InMemorySubscriptionRepository: write lock poisoned");

        let before = subscriptions.len();
        subscriptions.retain(|s| &s.id != id);
        if subscriptions.len() == before {
            return Err(SubscriptionError::NotFound);
        }
        Ok(())
    }

    async fn sum(&self, query: &SpendQuery) -> Result<i64, SubscriptionError> {
        Ok(self
            .subscriptions
            .read()
            .expect("InMemorySubscriptionRepository: lock poisoned")
            .iter()
            .filter(|s| query.matches(s))
            .map(|s| i64::from(s.price.value()))
            .sum())
    }
}
