//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, AuthConfig, KeysConfig, LogFormat, LoggingConfig, PostgresSettings, ServerConfig,
    StorageBackend, StorageConfig,
};
