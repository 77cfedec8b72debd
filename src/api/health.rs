//! Liveness and readiness endpoints

use std::time::Instant;

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;

use crate::api::types::Json;

use super::state::AppState;

/// Probe response body
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checks: Option<Vec<HealthCheck>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
}

/// Two-state component health
#[derive(Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

/// Outcome of probing one dependency
#[derive(Serialize)]
pub struct HealthCheck {
    pub name: String,
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
}

/// Basic health body, answers 200 whenever the process is up
pub async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: HealthStatus::Healthy,
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: None,
        latency_ms: None,
    })
}

/// Readiness probe, verifies the backing stores answer before the
/// instance is put into rotation
pub async fn ready_check(State(state): State<AppState>) -> impl IntoResponse {
    let start = Instant::now();
    let stores = probe_stores(&state).await;

    let status_code = match stores.status {
        HealthStatus::Healthy => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    let response = HealthResponse {
        status: stores.status,
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: Some(vec![stores]),
        latency_ms: Some(start.elapsed().as_millis() as u64),
    };

    (status_code, Json(response))
}

/// Liveness probe, answers as long as the process is serving
pub async fn live_check() -> impl IntoResponse {
    StatusCode::OK
}

async fn probe_stores(state: &AppState) -> HealthCheck {
    let start = Instant::now();

    let (status, message) = match state.key_service.ping_stores().await {
        Ok(()) => (HealthStatus::Healthy, None),
        Err(e) => (HealthStatus::Unhealthy, Some(e.to_string())),
    };

    HealthCheck {
        name: "stores".to_string(),
        status,
        message,
        latency_ms: Some(start.elapsed().as_millis() as u64),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_words_are_lowercase() {
        assert_eq!(
            serde_json::to_value(HealthStatus::Healthy).unwrap(),
            serde_json::json!("healthy")
        );
        assert_eq!(
            serde_json::to_value(HealthStatus::Unhealthy).unwrap(),
            serde_json::json!("unhealthy")
        );
    }

    #[test]
    fn test_bare_response_omits_optional_fields() {
        let body = serde_json::to_string(&HealthResponse {
            status: HealthStatus::Healthy,
            version: "0.1.0".to_string(),
            checks: None,
            latency_ms: None,
        })
        .unwrap();

        assert!(body.contains("\"status\":\"healthy\""));
        assert!(body.contains("\"version\":\"0.1.0\""));
        assert!(!body.contains("checks"));
        assert!(!body.contains("latency_ms"));
    }

    #[test]
    fn test_failed_store_probe_is_reported() {
        let probe = HealthCheck {
            name: "stores".to_string(),
            status: HealthStatus::Unhealthy,
            message: Some("pool timed out".to_string()),
            latency_ms: Some(12),
        };

        let body = serde_json::to_string(&HealthResponse {
            status: probe.status,
            version: "0.1.0".to_string(),
            checks: Some(vec![probe]),
            latency_ms: Some(13),
        })
        .unwrap();

        assert!(body.contains("\"status\":\"unhealthy\""));
        assert!(body.contains("\"stores\""));
        assert!(body.contains("pool timed out"));
    }
}
