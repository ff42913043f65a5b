//! ListSubscriptionsHandler - Query handler for paging through subscriptions.

use std::sync::Arc;

use tracing::info;

use crate::domain::subscription::{Subscription, SubscriptionError};
use crate::ports::{PageRequest, SubscriptionRepository};

use super::log_failure;

/// Query for one page of subscriptions.
#[derive(Debug, Clone, Copy)]
pub struct ListSubscriptionsQuery {
    pub page: PageRequest,
}

/// Result of a list query. An empty page is a success.
#[derive(Debug, Clone)]
pub struct ListSubscriptionsResult {
    pub subscriptions: Vec<Subscription>,
}

impl ListSubscriptionsResult {
    pub fn count(&self) -> usize {
        self.subscriptions.len()
    }
}

/// Handler for listing subscriptions, newest first.
pub struct ListSubscriptionsHandler {
    repository: Arc<dyn SubscriptionRepository>,
}

impl ListSubscriptionsHandler {
    pub fn new(repository: Arc<dyn SubscriptionRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(
        &self,
        query: ListSubscriptionsQuery,
    ) -> Result<ListSubscriptionsResult, SubscriptionError> {
        let subscriptions = self.repository.list(query.page).await.map_err(|e| {
            log_failure("list_subscriptions", &e);
            e
        })?;

        info!(
            limit = query.page.limit,
            offset = query.page.offset,
            count = subscriptions.len(),
            "Subscriptions listed"
        );

        Ok(ListSubscriptionsResult { subscriptions })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemorySubscriptionRepository;
    use crate::domain::foundation::{SubscriptionId, UserId};
    use crate::domain::subscription::{BillingPeriod, Price};
    use crate::ports::SpendQuery;
    use async_trait::async_trait;

    // ════════════════════════════════════════════════════════════════════════════
    // Mock Implementations
    // ════════════════════════════════════════════════════════════════════════════

    struct UnavailableRepository;

    #[async_trait]
    impl SubscriptionRepository for UnavailableRepository {
        async fn insert(&self, _s: &Subscription) -> Result<SubscriptionId, SubscriptionError> {
            Err(SubscriptionError::storage("connection refused"))
        }

        async fn get_by_id(&self, _id: &SubscriptionId) -> Result<Subscription, SubscriptionError> {
            Err(SubscriptionError::storage("connection refused"))
        }

        async fn list(&self, _page: PageRequest) -> Result<Vec<Subscription>, SubscriptionError> {
            Err(SubscriptionError::storage("connection refused"))
        }

        async fn update(&self, _s: &Subscription) -> Result<(), SubscriptionError> {
            Err(SubscriptionError::storage("connection refused"))
        }

        async fn delete(&self, _id: &SubscriptionId) -> Result<(), SubscriptionError> {
            Err(SubscriptionError::storage("connection refused"))
        }

        async fn sum(&self, _query: &SpendQuery) -> Result<i64, SubscriptionError> {
            Err(SubscriptionError::storage("connection refused"))
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Test Helpers
    // ════════════════════════════════════════════════════════════════════════════

    async fn seeded(count: usize) -> Arc<InMemorySubscriptionRepository> {
        let repo = Arc::new(InMemorySubscriptionRepository::new());
        let user_id: UserId = "60601fee-2bf1-4721-ae6f-7636e79a0cba".parse().unwrap();
        for i in 0..count {
            repo.insert(&Subscription::create(
                user_id,
                format!("service-{}", i),
                Price::try_new(100).unwrap(),
                BillingPeriod::resolve("07-2025", None).unwrap(),
            ))
            .await
            .unwrap();
        }
        repo
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn empty_store_is_empty_page() {
        let handler = ListSubscriptionsHandler::new(Arc::new(InMemorySubscriptionRepository::new()));

        let result = handler
            .handle(ListSubscriptionsQuery {
                page: PageRequest::new(100, 0),
            })
            .await
            .unwrap();

        assert_eq!(result.count(), 0);
    }

    #[tokio::test]
    async fn pages_newest_first() {
        let handler = ListSubscriptionsHandler::new(seeded(5).await);

        let result = handler
            .handle(ListSubscriptionsQuery {
                page: PageRequest::new(2, 1),
            })
            .await
            .unwrap();

        let services: Vec<&str> = result.subscriptions.iter().map(|s| s.service.as_str()).collect();
        assert_eq!(services, vec!["service-3", "service-2"]);
    }

    #[tokio::test]
    async fn store_clamps_out_of_range_page() {
        let handler = ListSubscriptionsHandler::new(seeded(15).await);

        let result = handler
            .handle(ListSubscriptionsQuery {
                page: PageRequest::new(0, -5),
            })
            .await
            .unwrap();

        assert_eq!(result.count(), 10);
    }

    #[tokio::test]
    async fn storage_failure_propagates() {
        let handler = ListSubscriptionsHandler::new(Arc::new(UnavailableRepository));

        let result = handler
            .handle(ListSubscriptionsQuery {
                page: PageRequest::new(10, 0),
            })
            .await;

        assert!(matches!(result, Err(SubscriptionError::StorageFailure(_))));
    }
}
