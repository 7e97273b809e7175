//! Around service entry point.
//!
//! Loads configuration, connects both storage backends, makes sure the post
//! index exists and serves the HTTP API until interrupted.

use around::{server, Dependencies, ServiceError, Settings};
use dotenv::dotenv;
use std::env;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing/logging.
fn init_tracing() -> Result<(), ServiceError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("around=info,around_repository=info,tower_http=info")
    });

    let json = env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true),
            )
            .try_init()
            .map_err(|e| ServiceError::config(e.to_string()))?;

        info!(
            service_name = "around",
            service_version = env!("CARGO_PKG_VERSION"),
            "Tracing initialized with JSON format"
        );
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(true).pretty())
            .try_init()
            .map_err(|e| ServiceError::config(e.to_string()))?;

        info!(
            service_name = "around",
            service_version = env!("CARGO_PKG_VERSION"),
            "Tracing initialized with console output"
        );
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), ServiceError> {
    dotenv().ok();

    init_tracing()?;

    info!("Starting around service");

    let settings = Settings::from_env();

    let deps = match Dependencies::new(&settings).await {
        Ok(deps) => {
            info!("Dependencies initialized successfully");
            deps
        }
        Err(e) => {
            error!(error = %e, "Failed to initialize dependencies");
            return Err(e);
        }
    };

    let app = server::create_app(deps.state, settings.request_timeout);

    match server::run_server(app, settings.server_addr).await {
        Ok(()) => {
            info!("Server shut down cleanly");
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Server failed");
            Err(e)
        }
    }
}
