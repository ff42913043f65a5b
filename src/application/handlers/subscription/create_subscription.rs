//! CreateSubscriptionHandler - Command handler for recording new subscriptions.

use std::sync::Arc;

use tracing::info;

use crate::domain::foundation::{SubscriptionId, UserId};
use crate::domain::subscription::{BillingPeriod, Price, Subscription, SubscriptionError};
use crate::ports::SubscriptionRepository;

use super::log_failure;

/// Command to create a subscription.
///
/// `start_date` and `end_date` are raw `MM-YYYY` strings.
#[derive(Debug, Clone)]
pub struct CreateSubscriptionCommand {
    pub user_id: UserId,
    pub service: String,
    pub price: Price,
    pub start_date: String,
    pub end_date: Option<String>,
}

/// Result of successful subscription creation.
#[derive(Debug, Clone)]
pub struct CreateSubscriptionResult {
    pub id: SubscriptionId,
}

/// Handler for creating subscriptions.
///
/// Without an `end_date` the subscription covers only its start month.
pub struct CreateSubscriptionHandler {
    repository: Arc<dyn SubscriptionRepository>,
}

impl CreateSubscriptionHandler {
    pub fn new(repository: Arc<dyn SubscriptionRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(
        &self,
        cmd: CreateSubscriptionCommand,
    ) -> Result<CreateSubscriptionResult, SubscriptionError> {
        self.create(cmd).await.map_err(|e| {
            log_failure("create_subscription", &e);
            e
        })
    }

    async fn create(
        &self,
        cmd: CreateSubscriptionCommand,
    ) -> Result<CreateSubscriptionResult, SubscriptionError> {
        // 1. Resolve the billing period
        let period = BillingPeriod::resolve(&cmd.start_date, cmd.end_date.as_deref())?;

        // 2. Build the aggregate; storage assigns the id
        let subscription = Subscription::create(cmd.user_id, cmd.service, cmd.price, period);

        // 3. Persist
        let id = self.repository.insert(&subscription).await?;

        info!(
            subscription_id = %id,
            user_id = %subscription.user_id,
            service = %subscription.service,
            "Subscription created"
        );

        Ok(CreateSubscriptionResult { id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemorySubscriptionRepository;
    use crate::ports::{PageRequest, SpendQuery};
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::Mutex;

    // ════════════════════════════════════════════════════════════════════════════
    // Mock Implementations
    // ════════════════════════════════════════════════════════════════════════════

    struct RejectingRepository {
        error: SubscriptionError,
        attempts: Mutex<Vec<Subscription>>,
    }

    impl RejectingRepository {
        fn with(error: SubscriptionError) -> Self {
            Self {
                error,
                attempts: Mutex::new(Vec::new()),
            }
        }

        fn attempts(&self) -> usize {
            self.attempts.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl SubscriptionRepository for RejectingRepository {
        async fn insert(&self, subscription: &Subscription) -> Result<SubscriptionId, SubscriptionError> {
            self.attempts.lock().unwrap().push(subscription.clone());
            Err(self.error.clone())
        }

        async fn get_by_id(&self, _id: &SubscriptionId) -> Result<Subscription, SubscriptionError> {
            Err(SubscriptionError::NotFound)
        }

        async fn list(&self, _page: PageRequest) -> Result<Vec<Subscription>, SubscriptionError> {
            Ok(vec![])
        }

        async fn update(&self, _subscription: &Subscription) -> Result<(), SubscriptionError> {
            Err(self.error.clone())
        }

        async fn delete(&self, _id: &SubscriptionId) -> Result<(), SubscriptionError> {
            Err(self.error.clone())
        }

        async fn sum(&self, _query: &SpendQuery) -> Result<i64, SubscriptionError> {
            Ok(0)
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Test Helpers
    // ════════════════════════════════════════════════════════════════════════════

    fn test_user_id() -> UserId {
        "60601fee-2bf1-4721-ae6f-7636e79a0cba".parse().unwrap()
    }

    fn command(service: &str, start: &str, end: Option<&str>) -> CreateSubscriptionCommand {
        CreateSubscriptionCommand {
            user_id: test_user_id(),
            service: service.to_string(),
            price: Price::try_new(400).unwrap(),
            start_date: start.to_string(),
            end_date: end.map(str::to_string),
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Success Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn creates_subscription_ending_with_start_month() {
        let repo = Arc::new(InMemorySubscriptionRepository::new());
        let handler = CreateSubscriptionHandler::new(repo.clone());

        let result = handler.handle(command("Yandex Plus", "07-2025", None)).await.unwrap();

        let stored = repo.get_by_id(&result.id).await.unwrap();
        assert_eq!(stored.service, "Yandex Plus");
        assert_eq!(stored.price.value(), 400);
        assert_eq!(stored.user_id, test_user_id());
        assert_eq!(stored.start_date, NaiveDate::from_ymd_opt(2025, 7, 1).unwrap());
        assert_eq!(stored.end_date, NaiveDate::from_ymd_opt(2025, 7, 31).unwrap());
    }

    #[tokio::test]
    async fn explicit_end_month_is_materialized_to_last_day() {
        let repo = Arc::new(InMemorySubscriptionRepository::new());
        let handler = CreateSubscriptionHandler::new(repo.clone());

        let result = handler
            .handle(command("Netflix", "01-2024", Some("02-2024")))
            .await
            .unwrap();

        let stored = repo.get_by_id(&result.id).await.unwrap();
        assert_eq!(stored.end_date, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }

    #[tokio::test]
    async fn assigns_distinct_ids() {
        let repo = Arc::new(InMemorySubscriptionRepository::new());
        let handler = CreateSubscriptionHandler::new(repo);

        let a = handler.handle(command("Netflix", "07-2025", None)).await.unwrap();
        let b = handler.handle(command("Spotify", "07-2025", None)).await.unwrap();
        assert_ne!(a.id, b.id);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Failure Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn second_create_for_same_user_and_service_is_duplicate() {
        let repo = Arc::new(InMemorySubscriptionRepository::new());
        let handler = CreateSubscriptionHandler::new(repo.clone());

        handler.handle(command("Netflix", "07-2025", None)).await.unwrap();
        let result = handler.handle(command("Netflix", "09-2025", None)).await;

        assert!(matches!(result, Err(SubscriptionError::Duplicate)));
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn malformed_start_never_reaches_storage() {
        let repo = Arc::new(RejectingRepository::with(SubscriptionError::storage("unreachable")));
        let handler = CreateSubscriptionHandler::new(repo.clone());

        let result = handler.handle(command("Netflix", "2025-07", None)).await;

        assert!(matches!(
            result,
            Err(SubscriptionError::InvalidPeriodFormat { ref field, .. }) if field == "start_date"
        ));
        assert_eq!(repo.attempts(), 0);
    }

    #[tokio::test]
    async fn malformed_end_is_reported_against_end_date() {
        let repo = Arc::new(InMemorySubscriptionRepository::new());
        let handler = CreateSubscriptionHandler::new(repo.clone());

        let result = handler.handle(command("Netflix", "07-2025", Some("13-2025"))).await;

        assert!(matches!(
            result,
            Err(SubscriptionError::InvalidPeriodFormat { ref field, .. }) if field == "end_date"
        ));
        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn storage_errors_pass_through_unchanged() {
        let repo = Arc::new(RejectingRepository::with(SubscriptionError::missing_required_field(
            "service",
        )));
        let handler = CreateSubscriptionHandler::new(repo.clone());

        let result = handler.handle(command("Netflix", "07-2025", None)).await;

        assert_eq!(
            result.unwrap_err(),
            SubscriptionError::MissingRequiredField("service".to_string())
        );
        assert_eq!(repo.attempts(), 1);
    }
}
