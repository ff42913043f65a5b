//! SummarizeSpendHandler - Query handler for total spend over a date window.

use std::sync::Arc;

use tracing::info;

use crate::domain::foundation::UserId;
use crate::domain::subscription::SubscriptionError;
use crate::ports::{DateWindow, SpendQuery, SubscriptionRepository};

use super::log_failure;

/// Query for total spend.
///
/// `window` must already satisfy `end >= start`; callers validate it.
#[derive(Debug, Clone)]
pub struct SummarizeSpendQuery {
    pub window: DateWindow,
    pub user_id: Option<UserId>,
    pub service: Option<String>,
}

/// Result of a spend query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummarizeSpendResult {
    pub total: i64,
}

/// Handler for summarizing spend.
///
/// Counts subscriptions whose start date falls in the window.
pub struct SummarizeSpendHandler {
    repository: Arc<dyn SubscriptionRepository>,
}

impl SummarizeSpendHandler {
    pub fn new(repository: Arc<dyn SubscriptionRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(
        &self,
        query: SummarizeSpendQuery,
    ) -> Result<SummarizeSpendResult, SubscriptionError> {
        let spend = SpendQuery {
            window: query.window,
            user_id: query.user_id,
            service: query.service,
        };

        let total = self.repository.sum(&spend).await.map_err(|e| {
            log_failure("summarize_spend", &e);
            e
        })?;

        info!(
            start = %spend.window.start,
            end = %spend.window.end,
            user_id = ?spend.user_id.map(|id| id.to_string()),
            service = ?spend.service,
            total,
            "Spend summarized"
        );

        Ok(SummarizeSpendResult { total })
    }
}
