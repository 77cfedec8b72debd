//! Key issuance endpoint handlers

use axum::extract::State;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::middleware::RootKeyBearer;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::key::CreateKeyRequest;

/// Response body for a freshly minted key
///
/// `key` carries the plaintext token. It is shown here and nowhere else;
/// afterwards only the digest survives.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateKeyResponseBody {
    pub key_id: String,
    pub key: String,
}

/// POST /v1/keys.createKey
pub async fn create_key(
    State(state): State<AppState>,
    RootKeyBearer(bearer): RootKeyBearer,
    Json(request): Json<CreateKeyRequest>,
) -> Result<Json<CreateKeyResponseBody>, ApiError> {
    debug!(api_id = %request.api_id, "Creating key");

    let issued = state
        .key_service
        .create_key(&bearer, request)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(CreateKeyResponseBody {
        key_id: issued.key.id().as_str().to_string(),
        key: issued.plaintext,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::api_namespace::{ApiId, ApiNamespace};
    use crate::domain::key::RatelimitRequest;
    use crate::domain::root_key::{Permission, RootKey, RootKeyId};
    use crate::domain::workspace::WorkspaceId;
    use crate::infrastructure::api_namespace::InMemoryApiNamespaceRepository;
    use crate::infrastructure::key::{
        hash_key, InMemoryKeyRepository, IssuanceConfig, KeyIssuanceService,
    };
    use crate::infrastructure::root_key::InMemoryRootKeyRepository;
    use axum::http::StatusCode;
    use std::sync::Arc;

    const ROOT_BEARER: &str = "keymint_root_handler_test";
    const API_ID: &str = "api_handler";

    async fn test_state() -> AppState {
        let keys = Arc::new(InMemoryKeyRepository::new());
        let root_keys = Arc::new(InMemoryRootKeyRepository::new());
        let namespaces = Arc::new(InMemoryApiNamespaceRepository::new());

        root_keys
            .insert(
                RootKey::new(
                    RootKeyId::generate(),
                    hash_key(ROOT_BEARER),
                    WorkspaceId::new("ws_handler"),
                )
                .with_permission(Permission::CreateKey),
            )
            .await;

        namespaces
            .insert(
                ApiNamespace::new(
                    ApiId::new(API_ID).unwrap(),
                    WorkspaceId::new("ws_handler"),
                    "handler tests",
                )
                .unwrap(),
            )
            .await;

        let service = KeyIssuanceService::new(
            keys,
            root_keys,
            namespaces,
            IssuanceConfig::default(),
        );

        AppState::new(Arc::new(service))
    }

    #[tokio::test]
    async fn test_create_key_returns_id_and_plaintext() {
        let state = test_state().await;

        let mut request = CreateKeyRequest::new(API_ID);
        request.prefix = Some("prod".to_string());

        let Json(body) = create_key(
            State(state),
            RootKeyBearer(ROOT_BEARER.to_string()),
            Json(request),
        )
        .await
        .unwrap();

        assert!(body.key_id.starts_with("key_"));
        assert!(body.key.starts_with("prod_"));
    }

    #[tokio::test]
    async fn test_unknown_bearer_maps_to_401() {
        let state = test_state().await;

        let err = create_key(
            State(state),
            RootKeyBearer("keymint_root_other".to_string()),
            Json(CreateKeyRequest::new(API_ID)),
        )
        .await
        .unwrap_err();

        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_invalid_ratelimit_type_maps_to_400() {
        let state = test_state().await;

        let mut request = CreateKeyRequest::new(API_ID);
        request.ratelimit = Some(RatelimitRequest {
            kind: "x".to_string(),
            limit: 10,
            duration: 1000,
        });

        let err = create_key(
            State(state),
            RootKeyBearer(ROOT_BEARER.to_string()),
            Json(request),
        )
        .await
        .unwrap_err();

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_namespace_maps_to_404() {
        let state = test_state().await;

        let err = create_key(
            State(state),
            RootKeyBearer(ROOT_BEARER.to_string()),
            Json(CreateKeyRequest::new("api_missing")),
        )
        .await
        .unwrap_err();

        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_foreign_namespace_maps_to_403() {
        let root_keys = Arc::new(InMemoryRootKeyRepository::new());
        root_keys
            .insert(
                RootKey::new(
                    RootKeyId::generate(),
                    hash_key("keymint_root_foreign"),
                    WorkspaceId::new("ws_foreign"),
                )
                .with_permission(Permission::CreateKey),
            )
            .await;

        let namespaces = Arc::new(InMemoryApiNamespaceRepository::new());
        namespaces
            .insert(
                ApiNamespace::new(
                    ApiId::new(API_ID).unwrap(),
                    WorkspaceId::new("ws_handler"),
                    "handler tests",
                )
                .unwrap(),
            )
            .await;

        let service = KeyIssuanceService::new(
            Arc::new(InMemoryKeyRepository::new()),
            root_keys,
            namespaces,
            IssuanceConfig::default(),
        );
        let state = AppState::new(Arc::new(service));

        let err = create_key(
            State(state),
            RootKeyBearer("keymint_root_foreign".to_string()),
            Json(CreateKeyRequest::new(API_ID)),
        )
        .await
        .unwrap_err();

        assert_eq!(err.status, StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_response_body_uses_camel_case() {
        let body = CreateKeyResponseBody {
            key_id: "key_123".to_string(),
            key: "prod_4vJq8PzT".to_string(),
        };

        let json = serde_json::to_string(&body).unwrap();
        assert!(json.contains("\"keyId\":\"key_123\""));
        assert!(json.contains("\"key\":\"prod_4vJq8PzT\""));
    }
}
