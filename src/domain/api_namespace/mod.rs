//! API namespace domain
//!
//! An API namespace is the container keys are minted into. Namespaces are
//! created out of band; issuance resolves them read-only to check that the
//! caller's workspace owns the namespace it is minting into.

mod entity;
mod repository;
mod validation;

pub use entity::{ApiId, ApiNamespace};
pub use repository::ApiNamespaceRepository;
pub use validation::{validate_api_id, ApiNamespaceValidationError};
