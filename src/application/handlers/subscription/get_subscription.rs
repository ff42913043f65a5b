//! GetSubscriptionHandler - Query handler for a single subscription.

use std::sync::Arc;

use crate::domain::foundation::SubscriptionId;
use crate::domain::subscription::{Subscription, SubscriptionError};
use crate::ports::SubscriptionRepository;

use super::log_failure;

/// Query to fetch one subscription.
#[derive(Debug, Clone)]
pub struct GetSubscriptionQuery {
    pub id: SubscriptionId,
}

/// Result of successful subscription query.
pub type GetSubscriptionResult = Subscription;

/// Handler for reading one subscription.
pub struct GetSubscriptionHandler {
    repository: Arc<dyn SubscriptionRepository>,
}

impl GetSubscriptionHandler {
    pub fn new(repository: Arc<dyn SubscriptionRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(
        &self,
        query: GetSubscriptionQuery,
    ) -> Result<GetSubscriptionResult, SubscriptionError> {
        self.repository.get_by_id(&query.id).await.map_err(|e| {
            log_failure("get_subscription", &e);
            e
        })
    }
}
