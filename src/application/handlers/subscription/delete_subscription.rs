//! DeleteSubscriptionHandler - Command handler for removing subscriptions.

use std::sync::Arc;

use tracing::info;

use crate::domain::foundation::SubscriptionId;
use crate::domain::subscription::SubscriptionError;
use crate::ports::SubscriptionRepository;

use super::log_failure;

/// Command to delete a subscription.
#[derive(Debug, Clone)]
pub struct DeleteSubscriptionCommand {
    pub id: SubscriptionId,
}

/// Result of successful deletion.
#[derive(Debug, Clone)]
pub struct DeleteSubscriptionResult {
    pub id: SubscriptionId,
}

/// Handler for deleting subscriptions.
pub struct DeleteSubscriptionHandler {
    repository: Arc<dyn SubscriptionRepository>,
}

impl DeleteSubscriptionHandler {
    pub fn new(repository: Arc<dyn SubscriptionRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(
        &self,
        cmd: DeleteSubscriptionCommand,
    ) -> Result<DeleteSubscriptionResult, SubscriptionError> {
        self.repository.delete(&cmd.id).await.map_err(|e| {
            log_failure("delete_subscription", &e);
            e
        })?;

        info!(subscription_id = %cmd.id, "Subscription deleted");

        Ok(DeleteSubscriptionResult { id: cmd.id })
    }
}
