//! HTTP server setup and routing.

pub mod error;
pub mod handlers;
pub mod state;

use std::net::SocketAddr;
use std::time::Duration;

use axum::{
    extract::{Request, State},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::ServiceError;

pub use error::ApiError;
pub use state::AppState;

/// Create the router with all routes and middleware.
///
/// Requests that run longer than `request_timeout` are answered with a 408
/// `request_timeout` error and their in-flight backend calls are dropped.
pub fn create_app(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        .route("/post", post(handlers::post_handler))
        .route("/search", get(handlers::search_handler))
        .route("/health", get(handlers::health_check))
        .layer(middleware::from_fn_with_state(request_timeout, enforce_deadline))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bound the whole request by `deadline`.
async fn enforce_deadline(
    State(deadline): State<Duration>,
    request: Request,
    next: Next,
) -> Response {
    match tokio::time::timeout(deadline, next.run(request)).await {
        Ok(response) => response,
        Err(_) => ApiError::Timeout(deadline).into_response(),
    }
}

/// Serve `app` on `addr` until Ctrl-C.
pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), ServiceError> {
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Server listening on {}", addr);
    info!("- Post endpoint: http://{}/post", addr);
    info!("- Search endpoint: http://{}/search", addr);
    info!("- Health endpoint: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
