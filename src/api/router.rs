use std::time::Duration;

use axum::{routing::get, Router};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use super::health;
use super::state::AppState;
use super::v1;

/// Requests that outlive this bound are answered with 408
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Create the full router with application state
pub fn create_router_with_state(state: AppState) -> Router {
    Router::new()
        // Health endpoints
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        // Issuance v1 API
        .nest("/v1", v1::create_v1_router())
        // Add state and middleware
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::api_namespace::InMemoryApiNamespaceRepository;
    use crate::infrastructure::key::{InMemoryKeyRepository, IssuanceConfig, KeyIssuanceService};
    use crate::infrastructure::root_key::InMemoryRootKeyRepository;
    use std::sync::Arc;

    #[test]
    fn test_router_builds_with_state() {
        let service = KeyIssuanceService::new(
            Arc::new(InMemoryKeyRepository::new()),
            Arc::new(InMemoryRootKeyRepository::new()),
            Arc::new(InMemoryApiNamespaceRepository::new()),
            IssuanceConfig::default(),
        );

        let _router = create_router_with_state(AppState::new(Arc::new(service)));
    }
}
