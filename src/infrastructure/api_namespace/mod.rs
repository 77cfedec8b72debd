//! API namespace infrastructure implementations

mod postgres_repository;
mod repository;

pub use postgres_repository::PostgresApiNamespaceRepository;
pub use repository::InMemoryApiNamespaceRepository;
