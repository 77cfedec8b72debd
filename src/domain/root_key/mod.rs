//! Root key domain
//!
//! Root keys are the privileged credentials callers present when minting new
//! API keys. Only their SHA-256 digest is ever stored; authentication walks
//! from the presented bearer token to the stored digest.

mod entity;
mod repository;

pub use entity::{Permission, RootKey, RootKeyId};
pub use repository::RootKeyRepository;
