//! Router assembly and the serve loop.
//!
//! `build_router` is pure wiring and is what the HTTP tests drive; `serve`
//! owns the process lifecycle: pool, migrations, listener, and graceful
//! shutdown bounded by `server.shutdown_timeout_secs`.

use std::future::IntoFuture;
use std::sync::Arc;

use axum::{routing::get, Json, Router};
use http::{header, HeaderValue, Method};
use serde_json::{json, Value};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::signal;
use tokio::sync::watch;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::adapters::http::{subscription_routes, SubscriptionHandlers};
use crate::adapters::postgres::{self, PostgresSubscriptionRepository};
use crate::config::{AppConfig, ServerConfig, ValidationError};
use crate::ports::SubscriptionRepository;

/// Errors that stop the server from starting or running.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ValidationError),

    #[error("Database connection failed: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Server I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Builds the full application router over `repository`.
pub fn build_router(repository: Arc<dyn SubscriptionRepository>, config: &ServerConfig) -> Router {
    let handlers = SubscriptionHandlers::from_repository(repository);

    let mut router = Router::new()
        .route("/health", get(health_check))
        .merge(subscription_routes(handlers))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(config.request_timeout())),
        );

    if let Some(cors) = cors_layer(config) {
        router = router.layer(cors);
    }

    router
}

/// Runs the HTTP server until SIGINT/SIGTERM, then drains.
///
/// In-flight requests get `shutdown_timeout` to finish; anything still
/// running after that is dropped.
pub async fn serve(config: AppConfig) -> Result<(), ServerError> {
    let addr = config.server.socket_addr()?;

    info!(database = %config.database.redacted_url(), "Connecting to database");
    let pool = postgres::connect(&config.database).await?;

    if config.database.run_migrations {
        postgres::run_migrations(&pool).await?;
    }

    let repository: Arc<dyn SubscriptionRepository> =
        Arc::new(PostgresSubscriptionRepository::new(pool.clone()));
    let app = build_router(repository, &config.server);

    let listener = TcpListener::bind(addr).await?;
    info!(address = %addr, "Subscriptions API listening");

    let (signalled_tx, mut signalled_rx) = watch::channel(false);
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            let _ = signalled_tx.send(true);
        })
        .into_future();

    let shutdown_timeout = config.server.shutdown_timeout();
    let drain_deadline = async move {
        if signalled_rx.changed().await.is_ok() {
            tokio::time::sleep(shutdown_timeout).await;
        } else {
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        result = server => result?,
        _ = drain_deadline => {
            warn!(
                timeout_secs = shutdown_timeout.as_secs(),
                "Graceful shutdown timed out, dropping in-flight requests"
            );
        }
    }

    pool.close().await;
    info!("Server stopped");
    Ok(())
}

/// Applies pending migrations and returns.
pub async fn migrate(config: AppConfig) -> Result<(), ServerError> {
    let pool = postgres::connect(&config.database).await?;
    postgres::run_migrations(&pool).await?;
    pool.close().await;
    Ok(())
}

async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

fn cors_layer(config: &ServerConfig) -> Option<CorsLayer> {
    let origins: Vec<HeaderValue> = config
        .cors_origins_list()
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring unparseable CORS origin");
                None
            }
        })
        .collect();

    if origins.is_empty() {
        return None;
    }

    Some(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([header::CONTENT_TYPE]),
    )
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C signal"),
        _ = terminate => info!("Received terminate signal"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::adapters::memory::InMemorySubscriptionRepository;

    fn app(config: &ServerConfig) -> Router {
        build_router(Arc::new(InMemorySubscriptionRepository::new()), config)
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let response = app(&ServerConfig::default())
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, json!({"status": "ok"}));
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let response = app(&ServerConfig::default())
            .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn configured_origin_gets_cors_headers() {
        let config = ServerConfig {
            cors_origins: Some("http://localhost:5173".to_string()),
            ..Default::default()
        };
        let response = app(&config)
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .header("origin", "http://localhost:5173")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.headers().get("access-control-allow-origin").unwrap(),
            "http://localhost:5173"
        );
    }

    #[test]
    fn no_origins_means_no_cors_layer() {
        assert!(cors_layer(&ServerConfig::default()).is_none());
    }
}
