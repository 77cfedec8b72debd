//! JSON body extraction

use axum::{
    extract::{FromRequest, Request},
    response::{IntoResponse, Response},
    Json as AxumJson,
};
use serde::de::DeserializeOwned;

use super::error::ApiError;

/// JSON extractor whose rejections use the documented error envelope
///
/// axum's extractor answers an unreadable body with a plaintext 422 or
/// 415. Issuance clients are promised a JSON envelope with a 400 status
/// for every malformed request, so extraction failures are rewritten
/// into [`ApiError`] before leaving the extractor.
#[derive(Debug, Clone, Copy, Default)]
pub struct Json<T>(pub T);

impl<T> Json<T> {
    /// Consume the extractor and return the inner value
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<S, T> FromRequest<S> for Json<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match AxumJson::<T>::from_request(req, state).await {
            Ok(AxumJson(value)) => Ok(Json(value)),
            Err(rejection) => Err(rejection_to_error(rejection)),
        }
    }
}

/// Map an axum body rejection onto the issuance error contract
fn rejection_to_error(rejection: axum::extract::rejection::JsonRejection) -> ApiError {
    use axum::extract::rejection::JsonRejection as Rejection;

    let message = match rejection {
        Rejection::JsonDataError(err) => {
            format!("Request body does not match the expected shape: {}", err.body_text())
        }
        Rejection::JsonSyntaxError(err) => {
            format!("Request body is not valid JSON: {}", err.body_text())
        }
        Rejection::MissingJsonContentType(_) => {
            "Request must carry a 'Content-Type: application/json' header".to_string()
        }
        Rejection::BytesRejection(err) => {
            format!("Request body could not be read: {}", err.body_text())
        }
        _ => "Request body was not accepted as JSON".to_string(),
    };

    ApiError::bad_request(message)
}

impl<T> IntoResponse for Json<T>
where
    T: serde::Serialize,
{
    fn into_response(self) -> Response {
        AxumJson(self.0).into_response()
    }
}

impl<T> std::ops::Deref for Json<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> std::ops::DerefMut for Json<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<T> From<T> for Json<T> {
    fn from(value: T) -> Self {
        Json(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::error::ApiErrorCode;
    use axum::body::Body;
    use axum::http::{header, StatusCode};

    #[tokio::test]
    async fn test_malformed_body_is_bad_request_envelope() {
        let request = Request::builder()
            .method("POST")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let err = <Json<serde_json::Value> as FromRequest<()>>::from_request(request, &())
            .await
            .unwrap_err();

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.response.error.code, ApiErrorCode::BadRequest);
        assert!(err.response.error.message.contains("not valid JSON"));
    }

    #[tokio::test]
    async fn test_missing_content_type_is_bad_request() {
        let request = Request::builder()
            .method("POST")
            .body(Body::from("{}"))
            .unwrap();

        let err = <Json<serde_json::Value> as FromRequest<()>>::from_request(request, &())
            .await
            .unwrap_err();

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(err.response.error.message.contains("Content-Type"));
    }

    #[test]
    fn test_json_derefs_to_inner_value() {
        let body = Json(vec!["key_abc".to_string()]);
        assert_eq!(body.len(), 1);
        assert_eq!(body.into_inner()[0], "key_abc");
    }
}
