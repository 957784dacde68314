//! Standalone REST API server binary.
//!
//! ## Purpose
//! Runs the REST API server on its own.
//!
//! ## Intended use
//! This binary is useful for development and debugging when you only want the
//! REST server (with OpenAPI/Swagger UI). The workspace's main `shiftcal-run`
//! binary is the production entry point.

use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{build_router, AppState};
use shiftcal_core::{
    constants::DEFAULT_BASE_URL, resolve_template_file, validate_template_file,
    weeks_ahead_from_env_value, CoreConfig,
};

/// Main entry point for the standalone shift calendar REST server.
///
/// Starts the REST API server on the configured address (default:
/// 0.0.0.0:8000) with HTTP endpoints for calendar feeds and OpenAPI/Swagger
/// documentation.
///
/// # Environment Variables
/// - `SHIFTCAL_REST_ADDR`: Server address (default: "0.0.0.0:8000")
/// - `SHIFTCAL_TEMPLATE_FILE`: Rotation template override path
/// - `SHIFTCAL_BASE_URL`: Public base URL for feed links
/// - `SHIFTCAL_WEEKS_AHEAD`: Feed horizon in weeks
///
/// # Returns
/// * `Ok(())` - If the server starts and runs successfully
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the rotation template cannot be located or fails validation,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("SHIFTCAL_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".into());

    tracing::info!("-- Starting shiftcal REST API on {}", addr);

    let template_override = std::env::var("SHIFTCAL_TEMPLATE_FILE")
        .ok()
        .map(PathBuf::from);
    let template_file = resolve_template_file(template_override)?;
    validate_template_file(&template_file)?;

    let base_url =
        std::env::var("SHIFTCAL_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());
    let weeks_ahead = weeks_ahead_from_env_value(std::env::var("SHIFTCAL_WEEKS_AHEAD").ok())?;

    let cfg = Arc::new(CoreConfig::new(template_file, base_url, weeks_ahead)?);

    let app = build_router(AppState::new(cfg));

    let listener = api_rest::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
