//! # API REST
//!
//! REST API implementation for the shift calendar service.
//!
//! Handles:
//! - HTTP endpoints with axum (landing page, `.ics` feeds, health)
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (response headers, CORS, error mapping)
//!
//! Uses `shiftcal-core` for template parsing, schedule expansion, and
//! iCalendar serialization.

#![warn(rust_2018_idioms)]

use anyhow::Context;
use axum::{
    extract::{Path as AxumPath, State},
    http::{header, HeaderName, StatusCode},
    response::{Html, Json},
    routing::get,
    Router,
};
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use shiftcal_core::{
    constants::SHIFT_COUNT, default_date_range, generate_calendar, CoreConfig, ShiftId,
};

/// Application state shared across REST API handlers.
///
/// Holds the startup-resolved configuration; the rotation template itself is
/// re-read per request so edits show up without a restart (the response's
/// cache header bounds the cost).
#[derive(Clone)]
pub struct AppState {
    cfg: Arc<CoreConfig>,
}

impl AppState {
    pub fn new(cfg: Arc<CoreConfig>) -> Self {
        Self { cfg }
    }
}

/// Health check response payload.
#[derive(Debug, serde::Serialize, serde::Deserialize, utoipa::ToSchema)]
pub struct HealthRes {
    pub status: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(read_root, all_shifts, shift_calendar, health),
    components(schemas(HealthRes))
)]
struct ApiDoc;

/// An `.ics` feed response: calendar media type, attachment disposition, and
/// a public cache window.
type FeedResponse = ([(HeaderName, String); 3], String);

/// Builds the REST router with all routes, Swagger UI, and CORS.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(read_root))
        .route("/health", get(health))
        .route("/calendars/all.ics", get(all_shifts))
        .route("/calendars/:filename", get(shift_calendar))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind the REST listener.
///
/// Binding happens before any request is accepted, so an occupied port or a
/// malformed address fails the caller with a diagnostic naming the address.
///
/// # Errors
/// Returns an error if the address cannot be bound (for example, already in
/// use or not parseable).
pub async fn bind(addr: &str) -> anyhow::Result<TcpListener> {
    TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind REST listener on {addr}"))
}

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Landing page with calendar subscription links", content_type = "text/html", body = String)
    )
)]
/// Landing page with calendar subscription links.
///
/// Lists the combined feed and the per-shift feeds as absolute URLs built
/// from the configured public base URL, with subscription instructions for
/// common calendar clients.
#[axum::debug_handler]
async fn read_root(State(state): State<AppState>) -> Html<String> {
    Html(landing_page(state.cfg.base_url()))
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint.
///
/// Used for monitoring and load balancer health checks.
#[axum::debug_handler]
async fn health() -> Json<HealthRes> {
    Json(HealthRes {
        status: "healthy".into(),
    })
}

#[utoipa::path(
    get,
    path = "/calendars/all.ics",
    responses(
        (status = 200, description = "Combined iCalendar feed for all shifts", content_type = "text/calendar", body = String),
        (status = 500, description = "Calendar generation failed")
    )
)]
/// Combined feed with every shift over the default date range.
#[axum::debug_handler]
async fn all_shifts(State(state): State<AppState>) -> Result<FeedResponse, (StatusCode, String)> {
    feed_response(&state, None, "all-shifts.ics")
}

#[utoipa::path(
    get,
    path = "/calendars/{filename}",
    params(
        ("filename" = String, Path, description = "Feed file name, `shift<n>.ics` with n between 1 and 5")
    ),
    responses(
        (status = 200, description = "iCalendar feed for a single shift", content_type = "text/calendar", body = String),
        (status = 400, description = "Shift number out of range"),
        (status = 404, description = "Unknown feed name"),
        (status = 500, description = "Calendar generation failed")
    )
)]
/// Single-shift feed, addressed as `/calendars/shift<n>.ics`.
#[axum::debug_handler]
async fn shift_calendar(
    State(state): State<AppState>,
    AxumPath(filename): AxumPath<String>,
) -> Result<FeedResponse, (StatusCode, String)> {
    let Some(shift_number) = parse_shift_filename(&filename) else {
        return Err((StatusCode::NOT_FOUND, format!("no such feed: {filename}")));
    };
    let shift = ShiftId::new(shift_number).map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            format!("Shift number must be between 1 and {SHIFT_COUNT}"),
        )
    })?;

    let selected: BTreeSet<ShiftId> = [shift].into_iter().collect();
    feed_response(&state, Some(&selected), &filename)
}

/// Generates a feed for the default date range and wraps it in calendar
/// response headers.
fn feed_response(
    state: &AppState,
    selected: Option<&BTreeSet<ShiftId>>,
    filename: &str,
) -> Result<FeedResponse, (StatusCode, String)> {
    let today = chrono::Local::now().date_naive();
    let (from, to) = default_date_range(today, state.cfg.weeks_ahead());

    let calendar = generate_calendar(state.cfg.template_file(), from, to, selected)
        .map_err(|error| {
            tracing::error!(%error, filename, "calendar generation failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "calendar generation failed".to_string(),
            )
        })?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/calendar".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={filename}"),
            ),
            (header::CACHE_CONTROL, "public, max-age=3600".to_string()),
        ],
        calendar.to_ical(),
    ))
}

/// Parses `shift<n>.ics` into `n`. Returns `None` for any other name; range
/// checking is the caller's concern so out-of-range numbers can 400 rather
/// than 404.
fn parse_shift_filename(filename: &str) -> Option<u8> {
    filename
        .strip_prefix("shift")?
        .strip_suffix(".ics")?
        .parse()
        .ok()
}

fn landing_page(base_url: &str) -> String {
    let mut links = format!(
        r#"        <div class="calendar-link">
            <h3>All Shifts</h3>
            <p><a href="{base_url}/calendars/all.ics">{base_url}/calendars/all.ics</a></p>
            <p>Includes all {SHIFT_COUNT} shifts combined</p>
        </div>
"#
    );
    for number in 1..=SHIFT_COUNT {
        links.push_str(&format!(
            r#"        <div class="calendar-link">
            <h3>Shift {number}</h3>
            <p><a href="{base_url}/calendars/shift{number}.ics">{base_url}/calendars/shift{number}.ics</a></p>
        </div>
"#
        ));
    }

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <title>Shift Calendar Subscriptions</title>
    <style>
        body {{
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Arial, sans-serif;
            max-width: 800px;
            margin: 50px auto;
            padding: 20px;
            line-height: 1.6;
        }}
        h1 {{ color: #333; }}
        .calendar-link {{
            background: #f5f5f5;
            padding: 15px;
            margin: 10px 0;
            border-radius: 5px;
            border-left: 4px solid #007bff;
        }}
        .calendar-link h3 {{ margin-top: 0; }}
        code {{
            background: #e9ecef;
            padding: 2px 6px;
            border-radius: 3px;
            font-family: monospace;
        }}
        a {{ color: #007bff; text-decoration: none; }}
        a:hover {{ text-decoration: underline; }}
    </style>
</head>
<body>
    <h1>Shift Calendar Subscriptions</h1>
    <p>Subscribe to these calendars in your favorite calendar application (Google Calendar, Apple Calendar, Outlook, etc.)</p>

{links}
    <h2>How to Subscribe</h2>
    <ul>
        <li><strong>Google Calendar:</strong> Settings &rarr; Add calendar &rarr; From URL</li>
        <li><strong>Apple Calendar:</strong> File &rarr; New Calendar Subscription</li>
        <li><strong>Outlook:</strong> Add calendar &rarr; Subscribe from web</li>
    </ul>
</body>
</html>
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;
    use tower::ServiceExt;

    const SAMPLE: &str = "\
day,shift1,shift2,shift3,shift4,shift5
1,07:00-15:00,,,23:00-07:00,15:00-23:00
2,,07:00-15:00,,,
";

    fn test_state(dir: &TempDir) -> AppState {
        let template = dir.path().join("template.csv");
        fs::write(&template, SAMPLE).expect("write template");
        let cfg = CoreConfig::new(template, "http://localhost:8000".into(), 4).unwrap();
        AppState::new(Arc::new(cfg))
    }

    async fn get(router: &Router, uri: &str) -> (StatusCode, axum::http::HeaderMap, String) {
        let response = router
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, headers, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let dir = TempDir::new().unwrap();
        let router = build_router(test_state(&dir));
        let (status, _, body) = get(&router, "/health").await;
        assert_eq!(status, StatusCode::OK);
        let parsed: HealthRes = serde_json::from_str(&body).unwrap();
        assert_eq!(parsed.status, "healthy");
    }

    #[tokio::test]
    async fn test_landing_page_lists_feeds() {
        let dir = TempDir::new().unwrap();
        let router = build_router(test_state(&dir));
        let (status, _, body) = get(&router, "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("http://localhost:8000/calendars/all.ics"));
        for number in 1..=SHIFT_COUNT {
            assert!(body.contains(&format!("/calendars/shift{number}.ics")));
        }
    }

    #[tokio::test]
    async fn test_all_shifts_feed() {
        let dir = TempDir::new().unwrap();
        let router = build_router(test_state(&dir));
        let (status, headers, body) = get(&router, "/calendars/all.ics").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[header::CONTENT_TYPE], "text/calendar");
        assert_eq!(
            headers[header::CONTENT_DISPOSITION],
            "attachment; filename=all-shifts.ics"
        );
        assert_eq!(headers[header::CACHE_CONTROL], "public, max-age=3600");
        assert!(body.starts_with("BEGIN:VCALENDAR\r\n"));
    }

    #[tokio::test]
    async fn test_single_shift_feed() {
        let dir = TempDir::new().unwrap();
        let router = build_router(test_state(&dir));
        let (status, headers, body) = get(&router, "/calendars/shift1.ics").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            headers[header::CONTENT_DISPOSITION],
            "attachment; filename=shift1.ics"
        );
        assert!(body.contains("X-WR-CALNAME:Shift 1\r\n"));
        assert!(!body.contains("SUMMARY:Shift 2"));
    }

    #[tokio::test]
    async fn test_out_of_range_shift_is_bad_request() {
        let dir = TempDir::new().unwrap();
        let router = build_router(test_state(&dir));
        let (status, _, body) = get(&router, "/calendars/shift9.ics").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("between 1 and 5"));
    }

    #[tokio::test]
    async fn test_unknown_feed_name_is_not_found() {
        let dir = TempDir::new().unwrap();
        let router = build_router(test_state(&dir));
        let (status, _, _) = get(&router, "/calendars/nope.ics").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_broken_template_is_internal_error() {
        let dir = TempDir::new().unwrap();
        let template = dir.path().join("template.csv");
        fs::write(&template, "not,a,template\n").unwrap();
        let cfg = CoreConfig::new(template, "http://localhost:8000".into(), 4).unwrap();
        let router = build_router(AppState::new(Arc::new(cfg)));
        let (status, _, _) = get(&router, "/calendars/all.ics").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_missing_template_is_internal_error() {
        let cfg = CoreConfig::new(
            PathBuf::from("/no/such/template.csv"),
            "http://localhost:8000".into(),
            4,
        )
        .unwrap();
        let router = build_router(AppState::new(Arc::new(cfg)));
        let (status, _, _) = get(&router, "/calendars/all.ics").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_parse_shift_filename() {
        assert_eq!(parse_shift_filename("shift3.ics"), Some(3));
        assert_eq!(parse_shift_filename("shift9.ics"), Some(9));
        assert_eq!(parse_shift_filename("shift.ics"), None);
        assert_eq!(parse_shift_filename("all.ics"), None);
        assert_eq!(parse_shift_filename("shift1"), None);
    }

    #[tokio::test]
    async fn test_bind_fails_when_port_taken() {
        let first = bind("127.0.0.1:0").await.unwrap();
        let addr = first.local_addr().unwrap();
        let err = bind(&addr.to_string()).await.unwrap_err();
        assert!(err.to_string().contains("failed to bind"));
    }
}
