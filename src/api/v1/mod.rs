//! v1 API endpoints

pub mod keys;

use axum::{routing::post, Router};

use super::state::AppState;

/// Create v1 API router
pub fn create_v1_router() -> Router<AppState> {
    Router::new().route("/keys.createKey", post(keys::create_key))
}
