//! 健康检查与指标

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use docreview_adapter_postgres::check_connection;
use docreview_telemetry::HealthStatus;

use crate::api::http::AppState;

/// GET /health
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthStatus>) {
    let mut status = HealthStatus::new();

    if let Some(pool) = &state.db {
        match check_connection(pool).await {
            Ok(()) => status.add_check("database", true, None),
            Err(e) => status.add_check("database", false, Some(e.to_string())),
        }
    }

    let code = if status.healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (code, Json(status))
}

/// GET /metrics
pub async fn metrics(State(state): State<AppState>) -> (StatusCode, String) {
    match &state.metrics {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (
            StatusCode::NOT_FOUND,
            "metrics recorder not installed".to_string(),
        ),
    }
}
