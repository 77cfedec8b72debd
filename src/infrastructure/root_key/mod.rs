//! Root key infrastructure implementations
//!
//! Storage backends for root keys plus a TTL-bounded read-through cache
//! used on the authorization hot path.

mod cache;
mod postgres_repository;
mod repository;

pub use cache::CachedRootKeyRepository;
pub use postgres_repository::PostgresRootKeyRepository;
pub use repository::InMemoryRootKeyRepository;
