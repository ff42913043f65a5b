//! PostgreSQL implementation of SubscriptionRepository.
//!
//! Persists Subscription aggregates to the `subscriptions` table.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder, Row};
use tracing::debug;
use uuid::Uuid;

use crate::domain::foundation::{SubscriptionId, Timestamp, UserId};
use crate::domain::subscription::{ensure_rows_affected, Price, Subscription, SubscriptionError};
use crate::ports::{PageRequest, SpendQuery, SubscriptionRepository};

use super::error_translation::translate;

const SELECT_COLUMNS: &str =
    "id, user_id, service, price, start_date, end_date, created_at, updated_at";

/// PostgreSQL implementation of SubscriptionRepository.
#[derive(Clone)]
pub struct PostgresSubscriptionRepository {
    pool: PgPool,
}

impl PostgresSubscriptionRepository {
    /// Creates a new PostgresSubscriptionRepository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubscriptionRepository for PostgresSubscriptionRepository {
    async fn insert(&self, subscription: &Subscription) -> Result<SubscriptionId, SubscriptionError> {
        let id = if subscription.id.is_nil() {
            SubscriptionId::new()
        } else {
            subscription.id
        };

        let stored: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO subscriptions (
                id, user_id, service, price, start_date, end_date
            ) VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(id.as_uuid())
        .bind(subscription.user_id.as_uuid())
        .bind(&subscription.service)
        .bind(subscription.price.value())
        .bind(subscription.start_date)
        .bind(subscription.end_date)
        .fetch_one(&self.pool)
        .await
        .map_err(translate)?;

        debug!(subscription_id = %stored, "Subscription row inserted");
        Ok(SubscriptionId::from_uuid(stored))
    }

    async fn get_by_id(&self, id: &SubscriptionId) -> Result<Subscription, SubscriptionError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM subscriptions WHERE id = $1",
            SELECT_COLUMNS
        ))
        .bind(id.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(translate)?;

        row_to_subscription(row)
    }

    async fn list(&self, page: PageRequest) -> Result<Vec<Subscription>, SubscriptionError> {
        let page = page.normalized();

        let rows = sqlx::query(&format!(
            "SELECT {} FROM subscriptions ORDER BY created_at DESC LIMIT $1 OFFSET $2",
            SELECT_COLUMNS
        ))
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await
        .map_err(translate)?;

        rows.into_iter().map(row_to_subscription).collect()
    }

    async fn update(&self, subscription: &Subscription) -> Result<(), SubscriptionError> {
        let result = sqlx::query(
            r#"
            UPDATE subscriptions SET
                service = $2,
                price = $3,
                start_date = $4,
                end_date = $5,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(subscription.id.as_uuid())
        .bind(&subscription.service)
        .bind(subscription.price.value())
        .bind(subscription.start_date)
        .bind(subscription.end_date)
        .execute(&self.pool)
        .await
        .map_err(translate)?;

        ensure_rows_affected(result.rows_affected())
    }

    async fn delete(&self, id: &SubscriptionId) -> Result<(), SubscriptionError> {
        let result = sqlx::query("DELETE FROM subscriptions WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(translate)?;

        ensure_rows_affected(result.rows_affected())
    }

    async fn sum(&self, query: &SpendQuery) -> Result<i64, SubscriptionError> {
        let mut builder = sum_query(query);
        let total: i64 = builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(translate)?;

        Ok(total)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Helper functions
// ════════════════════════════════════════════════════════════════════════════

/// Builds the spend sum statement with one bind per present filter.
fn sum_query(query: &SpendQuery) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(
        "SELECT COALESCE(SUM(price), 0)::BIGINT FROM subscriptions WHERE start_date >= ",
    );
    builder.push_bind(query.window.start);
    builder.push(" AND start_date <= ");
    builder.push_bind(query.window.end);

    if let Some(user_id) = &query.user_id {
        builder.push(" AND user_id = ");
        builder.push_bind(*user_id.as_uuid());
    }
    if let Some(service) = &query.service {
        builder.push(" AND service = ");
        builder.push_bind(service.clone());
    }

    builder
}

fn row_to_subscription(row: sqlx::postgres::PgRow) -> Result<Subscription, SubscriptionError> {
    let id: Uuid = column(&row, "id")?;
    let user_id: Uuid = column(&row, "user_id")?;
    let service: String = column(&row, "service")?;
    let price: i32 = column(&row, "price")?;
    let start_date: NaiveDate = column(&row, "start_date")?;
    let end_date: NaiveDate = column(&row, "end_date")?;
    let created_at: DateTime<Utc> = column(&row, "created_at")?;
    let updated_at: DateTime<Utc> = column(&row, "updated_at")?;

    let price = Price::try_new(i64::from(price))
        .map_err(|e| SubscriptionError::storage(format!("Invalid stored price: {}", e)))?;

    Ok(Subscription {
        id: SubscriptionId::from_uuid(id),
        user_id: UserId::from_uuid(user_id),
        service,
        price,
        start_date,
        end_date,
        created_at: Timestamp::from_datetime(created_at),
        updated_at: Timestamp::from_datetime(updated_at),
    })
}

fn column<'r, T>(row: &'r sqlx::postgres::PgRow, name: &str) -> Result<T, SubscriptionError>
where
    T: sqlx::Decode<'r, Postgres> + sqlx::Type<Postgres>,
{
    row.try_get(name)
        .map_err(|e| SubscriptionError::storage(format!("Failed to get {}: {}", name, e)))
}
