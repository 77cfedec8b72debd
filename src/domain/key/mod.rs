//! Key domain
//!
//! This module provides domain types for issued API keys: the stored entity,
//! the creation request contract, validation of that contract, and the
//! repository trait the issuance engine persists through.

mod entity;
mod repository;
mod request;
mod validation;

pub use entity::{Key, KeyId, Ratelimit, RatelimitKind};
pub use repository::KeyRepository;
pub use request::{CreateKeyParams, CreateKeyRequest, RatelimitRequest};
pub use validation::{
    validate_create_key, validate_key_id, KeyValidationError, MAX_KEY_BYTES, MAX_PREFIX_LENGTH,
    MIN_KEY_BYTES,
};
