//! HTTP server for exposing Prometheus metrics.
//!
//! `/metrics` scrapes the configured switch, `/probe?target=...` scrapes any
//! other switch with the same credentials. Every request runs its own cycle.

use crate::client::SansayClient;
use crate::collector::SansayCollector;
use crate::error::Result;
use crate::metrics;
use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Shared application state.
#[derive(Clone)]
struct AppState {
    client: Arc<SansayClient>,
}

#[derive(Debug, Deserialize)]
struct ProbeParams {
    target: Option<String>,
}

/// Build the exporter's routes.
pub fn router(client: Arc<SansayClient>) -> Router {
    let state = AppState { client };

    Router::new()
        .route("/metrics", get(metrics_handler))
        .route("/probe", get(probe_handler))
        .route("/health", get(health_handler))
        .route("/", get(root_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server.
///
/// # Examples
///
/// ```no_run
/// use sansay_exporter::client::SansayClient;
/// use sansay_exporter::config::SansayConfig;
/// use sansay_exporter::server::start_server;
///
/// #[tokio::main]
/// async fn main() {
///     let config = SansayConfig {
///         target: "10.0.0.5".to_string(),
///         username: "admin".to_string(),
///         password: "secret".to_string(),
///         verify_tls: false,
///         timeout_seconds: 10,
///     };
///     let client = SansayClient::new(config).unwrap();
///     start_server("0.0.0.0:9814", std::sync::Arc::new(client)).await.unwrap();
/// }
/// ```
pub async fn start_server(listen_address: &str, client: Arc<SansayClient>) -> Result<()> {
    let app = router(client);

    info!("Starting HTTP server on {}", listen_address);

    let listener = TcpListener::bind(listen_address).await?;

    axum::serve(listener, app)
        .await
        .map_err(|e| crate::error::SansayError::Server(e.to_string()))?;

    Ok(())
}

/// Handler for /metrics endpoint.
async fn metrics_handler(State(state): State<AppState>) -> Response {
    let target = state.client.default_target().to_string();
    info!("Received metrics scrape request for {}", target);
    scrape(state.client, target).await
}

/// Handler for /probe endpoint.
async fn probe_handler(
    State(state): State<AppState>,
    Query(params): Query<ProbeParams>,
) -> Response {
    let target = match params.target {
        Some(target) if !target.trim().is_empty() => target,
        _ => {
            return (StatusCode::BAD_REQUEST, "'target' parameter must be specified")
                .into_response()
        }
    };
    info!("Received probe request for {}", target);
    scrape(state.client, target).await
}

async fn scrape(client: Arc<SansayClient>, target: String) -> Response {
    let samples = SansayCollector::new(client, target).collect().await;

    if let Some(e) = metrics::cycle_error(&samples) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("{}: {}", metrics::ERROR_METRIC, e),
        )
            .into_response();
    }

    match metrics::encode(&samples) {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)],
            body,
        )
            .into_response(),
        Err(e) => {
            warn!("Failed to encode metrics: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to encode metrics: {}", e),
            )
                .into_response()
        }
    }
}

/// Handler for /health endpoint.
async fn health_handler() -> Response {
    (StatusCode::OK, "OK").into_response()
}

/// Handler for root endpoint.
async fn root_handler() -> Response {
    let html = r#"
<!DOCTYPE html>
<html>
<head>
    <title>Sansay Exporter</title>
    <style>
        body { font-family: Arial, sans-serif; margin: 40px; }
        h1 { color: #333; }
        a { color: #0066cc; text-decoration: none; }
        a:hover { text-decoration: underline; }
        .info { background: #f0f0f0; padding: 15px; border-radius: 5px; margin: 20px 0; }
    </style>
</head>
<body>
    <h1>Sansay Exporter</h1>
    <div class="info">
        <p>Prometheus metrics exporter for Sansay VSXi softswitches</p>
        <p><strong>Endpoints:</strong></p>
        <ul>
            <li><a href="/metrics">/metrics</a> - Metrics of the configured switch</li>
            <li>/probe?target=&lt;host&gt; - Metrics of any switch</li>
            <li><a href="/health">/health</a> - Health check</li>
        </ul>
    </div>
</body>
</html>
"#;

    (StatusCode::OK, axum::response::Html(html)).into_response()
}
