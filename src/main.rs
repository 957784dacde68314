//! Primary server binary for the shift calendar service.

use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{build_router, AppState};
use shiftcal_core::{
    constants::DEFAULT_BASE_URL, resolve_template_file, validate_template_file,
    weeks_ahead_from_env_value, CoreConfig,
};

/// Main entry point for the shift calendar service.
///
/// Binds the REST server on the configured address (default 0.0.0.0:8000)
/// and serves calendar feeds until the process is stopped. All startup
/// validation happens before the listener accepts its first connection:
/// a missing or malformed rotation template, an unparseable address, or an
/// already-bound port each terminate the process with a non-zero exit status
/// and a diagnostic on stderr.
///
/// # Environment Variables
/// - `SHIFTCAL_REST_ADDR`: Server address (default: "0.0.0.0:8000")
/// - `SHIFTCAL_TEMPLATE_FILE`: Rotation template override path
/// - `SHIFTCAL_BASE_URL`: Public base URL used in feed links
///   (default: "http://localhost:8000")
/// - `SHIFTCAL_WEEKS_AHEAD`: Feed horizon in weeks (default: 52)
///
/// # Returns
/// * `Ok(())` - If the server starts and runs successfully
/// * `Err(anyhow::Error)` - If startup validation, binding, or serving fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_rest=info".parse()?)
                .add_directive("shiftcal_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("SHIFTCAL_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".into());

    let template_override = std::env::var("SHIFTCAL_TEMPLATE_FILE")
        .ok()
        .map(PathBuf::from);
    let template_file = resolve_template_file(template_override)?;
    validate_template_file(&template_file)?;

    let base_url =
        std::env::var("SHIFTCAL_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());
    let weeks_ahead = weeks_ahead_from_env_value(std::env::var("SHIFTCAL_WEEKS_AHEAD").ok())?;

    let cfg = Arc::new(CoreConfig::new(template_file, base_url, weeks_ahead)?);

    tracing::info!("++ Starting shiftcal REST on {}", addr);
    tracing::info!(
        "++ Serving rotation template {}",
        cfg.template_file().display()
    );

    let app = build_router(AppState::new(cfg));

    let listener = api_rest::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
