//! Key issuance infrastructure
//!
//! This module provides the issuance engine and its moving parts: random
//! key material generation, token hashing, and the key repository
//! implementations (in-memory and PostgreSQL).

mod generator;
mod hasher;
mod postgres_repository;
mod repository;
mod service;

pub use generator::{GeneratedKeyMaterial, KeyMaterialGenerator};
pub use hasher::{hash_key, verify_key};
pub use postgres_repository::PostgresKeyRepository;
pub use repository::InMemoryKeyRepository;
pub use service::{IssuanceConfig, IssuedKey, KeyIssuanceService};
