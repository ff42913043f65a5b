//! UpdateSubscriptionHandler - Command handler for replacing a subscription's terms.

use std::sync::Arc;

use tracing::info;

use crate::domain::foundation::SubscriptionId;
use crate::domain::subscription::{BillingPeriod, Price, Subscription, SubscriptionError};
use crate::ports::SubscriptionRepository;

use super::log_failure;

/// Command to update a subscription.
///
/// Every mutable field is replaced; there is no partial patch.
#[derive(Debug, Clone)]
pub struct UpdateSubscriptionCommand {
    pub id: SubscriptionId,
    pub service: String,
    pub price: Price,
    pub start_date: String,
    pub end_date: Option<String>,
}

/// Result of successful subscription update.
#[derive(Debug, Clone)]
pub struct UpdateSubscriptionResult {
    pub subscription: Subscription,
}

/// Handler for updating subscriptions.
///
/// The existence check and the write are separate storage calls. A delete
/// that lands between them surfaces as `NotFound` from the write.
pub struct UpdateSubscriptionHandler {
    repository: Arc<dyn SubscriptionRepository>,
}

impl UpdateSubscriptionHandler {
    pub fn new(repository: Arc<dyn SubscriptionRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(
        &self,
        cmd: UpdateSubscriptionCommand,
    ) -> Result<UpdateSubscriptionResult, SubscriptionError> {
        self.update(cmd).await.map_err(|e| {
            log_failure("update_subscription", &e);
            e
        })
    }

    async fn update(
        &self,
        cmd: UpdateSubscriptionCommand,
    ) -> Result<UpdateSubscriptionResult, SubscriptionError> {
        // 1. Assert existence
        let mut subscription = self.repository.get_by_id(&cmd.id).await?;

        // 2. Resolve the new billing period
        let period = BillingPeriod::resolve(&cmd.start_date, cmd.end_date.as_deref())?;

        // 3. Overwrite mutable fields
        subscription.revise(cmd.service, cmd.price, period);

        // 4. Persist
        self.repository.update(&subscription).await?;

        info!(
            subscription_id = %subscription.id,
            service = %subscription.service,
            "Subscription updated"
        );

        Ok(UpdateSubscriptionResult { subscription })
    }
}
