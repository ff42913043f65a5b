//! HTTP adapter for subscription endpoints.
//!
//! Exposes the subscription use cases via REST API:
//! - `POST /subscriptions` - Create a subscription
//! - `GET /subscriptions` - List subscriptions
//! - `GET /subscriptions/summary` - Total spend over a date window
//! - `GET /subscriptions/:id` - Get one subscription
//! - `PUT /subscriptions/:id` - Update a subscription
//! - `DELETE /subscriptions/:id` - Delete a subscription

mod dto;
mod handlers;
mod routes;

pub use dto::{
    CreateSubscriptionRequest, CreatedResponse, ErrorResponse, ListSubscriptionsParams,
    MessageResponse, SubscriptionListResponse, SubscriptionResponse, SummaryParams,
    SummaryResponse, UpdateSubscriptionRequest, DATE_FORMAT,
};
pub use handlers::SubscriptionHandlers;
pub use routes::subscription_routes;
