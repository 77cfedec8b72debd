//! Storage infrastructure - connection pooling and schema management

pub mod migrations;
mod postgres;

pub use migrations::{migrate_to_latest, Migration, PostgresMigrator, SCHEMA_MIGRATIONS};
pub use postgres::connect_pool;
