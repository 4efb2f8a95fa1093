use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::engine::RiskEngine;
use crate::error::EngineError;
use crate::observability::MetricsRegistry;
use crate::rules::RuleSet;

use super::request::{EvaluateRequest, ScreenRequest};
use super::response::{
    DecisionResponse, ErrorResponse, HealthResponse, ReadyResponse, ScreenResponse,
};

/// Shared application state.
pub struct AppState {
    /// The decision pipeline
    pub engine: Arc<RiskEngine>,

    /// Current rule set (updated via watch channel)
    pub ruleset_rx: watch::Receiver<Arc<RuleSet>>,

    /// Metrics registry shared with the engine
    pub metrics: Arc<MetricsRegistry>,

    /// Application start time
    pub start_time: Instant,

    /// Application version
    pub version: String,

    /// Latency budget in milliseconds
    pub latency_budget_ms: u64,
}

/// Create the application router.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/v1/fraud/evaluate", post(handle_evaluate))
        .route("/v1/aml/screen", post(handle_screen))
        .route("/health", get(handle_health))
        .route("/ready", get(handle_ready))
        .route("/metrics", get(handle_metrics))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn error_response(e: EngineError) -> axum::response::Response {
    match e {
        EngineError::InvalidInput(msg) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request(msg)),
        )
            .into_response(),
    }
}

/// Handle fraud evaluation requests.
async fn handle_evaluate(
    State(state): State<Arc<AppState>>,
    Json(req): Json<EvaluateRequest>,
) -> axum::response::Response {
    let start = Instant::now();

    let (tx, ctx) = match req.to_domain() {
        Ok(pair) => pair,
        Err(e) => return error_response(e),
    };

    let decision = match state.engine.evaluate(&tx, &ctx).await {
        Ok(d) => d,
        Err(e) => return error_response(e),
    };

    let elapsed = start.elapsed();
    if elapsed.as_millis() > state.latency_budget_ms as u128 {
        warn!(
            transaction_id = tx.id.as_str(),
            latency_ms = elapsed.as_millis(),
            budget_ms = state.latency_budget_ms,
            "evaluation latency exceeded budget"
        );
    }

    (
        StatusCode::OK,
        Json(DecisionResponse::new(decision, elapsed.as_millis() as u32)),
    )
        .into_response()
}

/// Handle sanctions screening requests.
async fn handle_screen(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ScreenRequest>,
) -> axum::response::Response {
    let start = Instant::now();

    let profile = req.to_profile();

    let result = match state.engine.screen(&profile).await {
        Ok(r) => r,
        Err(e) => return error_response(e),
    };

    (
        StatusCode::OK,
        Json(ScreenResponse::new(result, start.elapsed().as_millis() as u32)),
    )
        .into_response()
}

/// Health check endpoint.
async fn handle_health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let policy_version = state.ruleset_rx.borrow().version().to_string();

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: state.version.clone(),
        policy_version,
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

/// Readiness check endpoint.
async fn handle_ready(State(state): State<Arc<AppState>>) -> axum::response::Response {
    let ruleset = state.ruleset_rx.borrow();

    if ruleset.rule_count() == 0 {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorResponse::new("No rules loaded", "NOT_READY")),
        )
            .into_response();
    }

    (
        StatusCode::OK,
        Json(ReadyResponse {
            ready: true,
            policy_version: ruleset.version().to_string(),
            rules_loaded: ruleset.rule_count(),
        }),
    )
        .into_response()
}

/// Metrics endpoint (Prometheus format).
async fn handle_metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let rules_loaded = state.ruleset_rx.borrow().rule_count();

    let mut body = state.metrics.to_prometheus();
    body.push_str(&format!(
        r#"
# HELP fraudr_uptime_seconds Application uptime in seconds
# TYPE fraudr_uptime_seconds counter
fraudr_uptime_seconds {}

# HELP fraudr_rules_loaded Number of fraud rules loaded
# TYPE fraudr_rules_loaded gauge
fraudr_rules_loaded {}
"#,
        state.start_time.elapsed().as_secs(),
        rules_loaded,
    ));

    (
        StatusCode::OK,
        [(
            axum::http::header::CONTENT_TYPE,
            "text/plain; charset=utf-8",
        )],
        body,
    )
}
