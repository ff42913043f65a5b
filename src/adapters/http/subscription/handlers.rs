//! HTTP handlers for subscription endpoints.

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::validation::{RequestValidator, ValidationErrors};
use crate::application::handlers::subscription::{
    CreateSubscriptionHandler, DeleteSubscriptionCommand, DeleteSubscriptionHandler,
    GetSubscriptionHandler, GetSubscriptionQuery, ListSubscriptionsHandler,
    ListSubscriptionsQuery, SummarizeSpendHandler, UpdateSubscriptionHandler,
};
use crate::domain::foundation::ErrorCode;
use crate::domain::subscription::SubscriptionError;
use crate::ports::SubscriptionRepository;

use super::dto::{
    CreateSubscriptionRequest, CreatedResponse, ErrorResponse, ListSubscriptionsParams,
    MessageResponse, SubscriptionListResponse, SubscriptionResponse, SummaryParams,
    SummaryResponse, UpdateSubscriptionRequest,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct SubscriptionHandlers {
    create_handler: Arc<CreateSubscriptionHandler>,
    get_handler: Arc<GetSubscriptionHandler>,
    list_handler: Arc<ListSubscriptionsHandler>,
    update_handler: Arc<UpdateSubscriptionHandler>,
    delete_handler: Arc<DeleteSubscriptionHandler>,
    summarize_handler: Arc<SummarizeSpendHandler>,
    validator: RequestValidator,
}

impl SubscriptionHandlers {
    pub fn new(
        create_handler: Arc<CreateSubscriptionHandler>,
        get_handler: Arc<GetSubscriptionHandler>,
        list_handler: Arc<ListSubscriptionsHandler>,
        update_handler: Arc<UpdateSubscriptionHandler>,
        delete_handler: Arc<DeleteSubscriptionHandler>,
        summarize_handler: Arc<SummarizeSpendHandler>,
        validator: RequestValidator,
    ) -> Self {
        Self {
            create_handler,
            get_handler,
            list_handler,
            update_handler,
            delete_handler,
            summarize_handler,
            validator,
        }
    }

    /// Wires every handler to one repository.
    pub fn from_repository(repository: Arc<dyn SubscriptionRepository>) -> Self {
        Self::new(
            Arc::new(CreateSubscriptionHandler::new(repository.clone())),
            Arc::new(GetSubscriptionHandler::new(repository.clone())),
            Arc::new(ListSubscriptionsHandler::new(repository.clone())),
            Arc::new(UpdateSubscriptionHandler::new(repository.clone())),
            Arc::new(DeleteSubscriptionHandler::new(repository.clone())),
            Arc::new(SummarizeSpendHandler::new(repository)),
            RequestValidator::new(),
        )
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /subscriptions - Create a subscription
pub async fn create_subscription(
    State(handlers): State<SubscriptionHandlers>,
    body: Result<Json<CreateSubscriptionRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match body {
        Ok(body) => body,
        Err(rejection) => return handle_rejection(rejection.body_text()),
    };
    let cmd = match handlers.validator.validate_create(req) {
        Ok(cmd) => cmd,
        Err(errors) => return handle_validation_errors(errors),
    };

    match handlers.create_handler.handle(cmd).await {
        Ok(result) => {
            let response = CreatedResponse {
                id: result.id.to_string(),
                message: "subscription created successfully".to_string(),
            };
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => handle_subscription_error(e),
    }
}

/// GET /subscriptions - List subscriptions, newest first
pub async fn list_subscriptions(
    State(handlers): State<SubscriptionHandlers>,
    params: Result<Query<ListSubscriptionsParams>, QueryRejection>,
) -> Response {
    let Query(params) = match params {
        Ok(params) => params,
        Err(rejection) => return handle_rejection(rejection.body_text()),
    };
    let page = match handlers.validator.validate_page(&params) {
        Ok(page) => page,
        Err(errors) => return handle_validation_errors(errors),
    };

    match handlers.list_handler.handle(ListSubscriptionsQuery { page }).await {
        Ok(result) => {
            let response = SubscriptionListResponse::from(result.subscriptions);
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_subscription_error(e),
    }
}

/// GET /subscriptions/summary - Total spend over a date window
pub async fn summarize_spend(
    State(handlers): State<SubscriptionHandlers>,
    params: Result<Query<SummaryParams>, QueryRejection>,
) -> Response {
    let Query(params) = match params {
        Ok(params) => params,
        Err(rejection) => return handle_rejection(rejection.body_text()),
    };
    let query = match handlers.validator.validate_summary(params) {
        Ok(query) => query,
        Err(errors) => return handle_validation_errors(errors),
    };

    match handlers.summarize_handler.handle(query).await {
        Ok(result) => (StatusCode::OK, Json(SummaryResponse { total: result.total })).into_response(),
        Err(e) => handle_subscription_error(e),
    }
}

/// GET /subscriptions/:id - Get one subscription
pub async fn get_subscription(
    State(handlers): State<SubscriptionHandlers>,
    Path(id): Path<String>,
) -> Response {
    let id = match handlers.validator.validate_id(&id) {
        Ok(id) => id,
        Err(errors) => return handle_validation_errors(errors),
    };

    match handlers.get_handler.handle(GetSubscriptionQuery { id }).await {
        Ok(subscription) => {
            let response = SubscriptionResponse::from(subscription);
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_subscription_error(e),
    }
}

/// PUT /subscriptions/:id - Replace a subscription's terms
pub async fn update_subscription(
    State(handlers): State<SubscriptionHandlers>,
    Path(id): Path<String>,
    body: Result<Json<UpdateSubscriptionRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match body {
        Ok(body) => body,
        Err(rejection) => return handle_rejection(rejection.body_text()),
    };
    let cmd = match handlers.validator.validate_update(&id, req) {
        Ok(cmd) => cmd,
        Err(errors) => return handle_validation_errors(errors),
    };

    match handlers.update_handler.handle(cmd).await {
        Ok(_) => (
            StatusCode::OK,
            Json(MessageResponse::new("subscription updated successfully")),
        )
            .into_response(),
        Err(e) => handle_subscription_error(e),
    }
}

/// DELETE /subscriptions/:id - Delete a subscription
pub async fn delete_subscription(
    State(handlers): State<SubscriptionHandlers>,
    Path(id): Path<String>,
) -> Response {
    let id = match handlers.validator.validate_id(&id) {
        Ok(id) => id,
        Err(errors) => return handle_validation_errors(errors),
    };

    match handlers.delete_handler.handle(DeleteSubscriptionCommand { id }).await {
        Ok(_) => (
            StatusCode::OK,
            Json(MessageResponse::new("subscription deleted successfully")),
        )
            .into_response(),
        Err(e) => handle_subscription_error(e),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Error handling
// ════════════════════════════════════════════════════════════════════════════

fn handle_subscription_error(error: SubscriptionError) -> Response {
    let status = match &error {
        SubscriptionError::InvalidPeriodFormat { .. }
        | SubscriptionError::MissingRequiredField(_) => StatusCode::BAD_REQUEST,
        SubscriptionError::NotFound => StatusCode::NOT_FOUND,
        SubscriptionError::Duplicate => StatusCode::CONFLICT,
        SubscriptionError::StorageFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let body = ErrorResponse::new(error.code().to_string(), error.message());
    (status, Json(body)).into_response()
}

fn handle_validation_errors(errors: ValidationErrors) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse::with_fields(
            ErrorCode::ValidationFailed.to_string(),
            "validation failed",
            errors.into_fields(),
        )),
    )
        .into_response()
}

fn handle_rejection(message: String) -> Response {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse::bad_request(message))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ValidationError;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn not_found_maps_to_404() {
        let response = handle_subscription_error(SubscriptionError::NotFound);
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn duplicate_maps_to_409() {
        let response = handle_subscription_error(SubscriptionError::Duplicate);
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn invalid_period_maps_to_400() {
        let response = handle_subscription_error(SubscriptionError::InvalidPeriodFormat {
            field: "start_date".to_string(),
            value: "2025-07".to_string(),
        });
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn missing_required_field_maps_to_400() {
        let response =
            handle_subscription_error(SubscriptionError::missing_required_field("service"));
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn storage_failure_maps_to_500_without_detail() {
        let response =
            handle_subscription_error(SubscriptionError::storage("relation does not exist"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["code"], "DATABASE_ERROR");
        assert_eq!(body["error"], "internal server error");
    }

    #[tokio::test]
    async fn validation_errors_render_fields() {
        let errors = ValidationErrors::from(ValidationError::empty_field("service"));
        let response = handle_validation_errors(errors);
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["code"], "VALIDATION_FAILED");
        assert_eq!(body["fields"]["service"], "Field 'service' cannot be empty");
    }
}
