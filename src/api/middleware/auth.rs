//! Root key authentication middleware

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use crate::api::types::ApiError;

/// Extractor that pulls the caller's root key from `Authorization: Bearer <key>`
///
/// Only the header syntax is checked here. The credential is resolved and
/// its capabilities enforced by the issuance service, after the request
/// body has been validated. The raw value must not be logged.
#[derive(Debug, Clone)]
pub struct RootKeyBearer(pub String);

impl RootKeyBearer {
    /// Consume the extractor and return the raw bearer value
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl<S> FromRequestParts<S> for RootKeyBearer
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let bearer = extract_bearer_from_headers(&parts.headers)?;

        Ok(RootKeyBearer(bearer))
    }
}

fn extract_bearer_from_headers(headers: &axum::http::HeaderMap) -> Result<String, ApiError> {
    let auth_header = headers.get(header::AUTHORIZATION).ok_or_else(|| {
        ApiError::unauthorized("Root key required. Provide via 'Authorization: Bearer <key>' header")
    })?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| ApiError::unauthorized("Invalid Authorization header encoding"))?;

    let token = auth_str
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::unauthorized("Authorization header must use the Bearer scheme"))?
        .trim();

    if token.is_empty() {
        return Err(ApiError::unauthorized("Bearer token is empty"));
    }

    Ok(token.to_string())
}
