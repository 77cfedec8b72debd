//! Infrastructure layer - External service implementations

pub mod api_namespace;
pub mod key;
pub mod logging;
pub mod root_key;
pub mod storage;
