//! HTTP routes for subscription endpoints.

use axum::routing::{get, post};
use axum::Router;

use super::handlers::{
    create_subscription, delete_subscription, get_subscription, list_subscriptions,
    summarize_spend, update_subscription, SubscriptionHandlers,
};

/// Creates the subscription router with all endpoints.
///
/// Routes:
/// - `POST /subscriptions` - Create a subscription
/// - `GET /subscriptions?limit=&offset=` - List subscriptions
/// - `GET /subscriptions/summary?start_date=&end_date=&user_id=&service=` - Total spend
/// - `GET /subscriptions/:id` - Get one subscription
/// - `PUT /subscriptions/:id` - Update a subscription
/// - `DELETE /subscriptions/:id` - Delete a subscription
pub fn subscription_routes(handlers: SubscriptionHandlers) -> Router {
    Router::new()
        .route(
            "/subscriptions",
            post(create_subscription).get(list_subscriptions),
        )
        .route("/subscriptions/summary", get(summarize_spend))
        .route(
            "/subscriptions/:id",
            get(get_subscription)
                .put(update_subscription)
                .delete(delete_subscription),
        )
        .with_state(handlers)
}
