//! REST API server module
//!
//! Exposes the merge pipeline over HTTP: direct merges, merges of stored
//! reports, a health check and the OpenAPI document.

use crate::{Config, MergeService, Result};
use axum::{
    Router,
    http::HeaderValue,
    routing::{get, post},
};
use std::future::{Future, IntoFuture};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod error_response;
pub mod openapi;
pub mod routes;
mod signal;
pub mod state;

pub use openapi::ApiDoc;
pub use signal::shutdown_signal;
pub use state::AppState;

/// Create the API router with all route definitions
///
/// # Routes
///
/// ## Merging
/// - `POST /merge` - Merge the documents listed in the request body
/// - `GET /report/:id` - Merge the documents of a stored report
///
/// ## System
/// - `GET /health` - Health check
/// - `GET /openapi.json` - OpenAPI specification
pub fn create_router(service: Arc<MergeService>, config: Arc<Config>) -> Router {
    let state = AppState::new(service);

    let router = Router::new()
        // Merging
        .route("/merge", post(routes::merge_documents))
        .route("/report/:id", get(routes::merge_report))
        // System
        .route("/health", get(routes::health_check))
        .route("/openapi.json", get(routes::openapi_spec))
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    // Apply CORS middleware if enabled in config
    if config.server.api.cors_enabled {
        let cors = build_cors_layer(&config.server.api.cors_origins);
        router.layer(cors)
    } else {
        router
    }
}

/// Build a CORS layer based on configured origins
///
/// `"*"` anywhere in the list (or an empty list) allows every origin.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    let allow_any = origins.iter().any(|o| o == "*");

    if allow_any || origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let allowed: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();

        CorsLayer::new()
            .allow_origin(AllowOrigin::list(allowed))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

/// Start the API server on the configured bind address.
///
/// Serves until `shutdown` resolves. In-flight requests then get
/// `shutdown_timeout_secs` to finish before the server stops regardless.
///
/// # Example
///
/// ```no_run
/// use docmerge::{Config, MergeService};
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Arc::new(Config::default());
/// let service = Arc::new(MergeService::new((*config).clone())?);
///
/// // Blocks until SIGINT/SIGTERM
/// docmerge::api::start_api_server(service, config, docmerge::api::shutdown_signal()).await?;
/// # Ok(())
/// # }
/// ```
pub async fn start_api_server<F>(
    service: Arc<MergeService>,
    config: Arc<Config>,
    shutdown: F,
) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let bind_address = config.server.api.bind_address;
    let grace_period = Duration::from_secs(config.server.api.shutdown_timeout_secs);

    tracing::info!(
        address = %bind_address,
        "Starting API server"
    );

    let app = create_router(service, config);

    let listener = TcpListener::bind(bind_address)
        .await
        .map_err(crate::error::Error::Io)?;

    tracing::info!(
        address = %listener.local_addr().unwrap_or(bind_address),
        "API server listening"
    );

    serve_until(listener, app, shutdown, grace_period).await?;

    tracing::info!("API server stopped");
    Ok(())
}

/// Start the API server and run it until SIGTERM or SIGINT
pub async fn run_until_signal(service: Arc<MergeService>, config: Arc<Config>) -> Result<()> {
    start_api_server(service, config, shutdown_signal()).await
}

/// Serve `app` on `listener` with graceful shutdown bounded by `grace_period`
async fn serve_until<F>(
    listener: TcpListener,
    app: Router,
    shutdown: F,
    grace_period: Duration,
) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let (started_tx, started_rx) = tokio::sync::oneshot::channel::<()>();
    let shutdown = async move {
        shutdown.await;
        tracing::info!(
            grace_period_secs = grace_period.as_secs(),
            "Shutting down API server"
        );
        let _ = started_tx.send(());
    };

    let server = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .into_future();

    let deadline = async move {
        // The sender only drops without sending once the server itself has stopped.
        if started_rx.await.is_err() {
            std::future::pending::<()>().await;
        }
        tokio::time::sleep(grace_period).await;
    };

    tokio::select! {
        result = server => {
            result.map_err(|e| crate::error::Error::ApiServerError(e.to_string()))
        }
        _ = deadline => {
            tracing::warn!(
                grace_period_secs = grace_period.as_secs(),
                "In-flight requests did not finish within the shutdown grace period"
            );
            Ok(())
        }
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;
