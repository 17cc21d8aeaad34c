//! Domain Layer - Core Entity Trait
//!
//! This trait defines the basic contract for all domain entities.
//! Entities mirror rows of the remote store; identifiers are
//! server-assigned opaque strings.

use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Core trait for all domain entities
pub trait Entity: Sized + Send + Sync + Clone + Serialize + DeserializeOwned + 'static {
    /// Insert payload; the server fills identifier and timestamps
    type Draft: Send + Sync + 'static;

    /// Partial update payload
    type Patch: Send + Sync + 'static;

    /// Table name on the remote store
    const TABLE: &'static str;

    /// Returns the entity's unique identifier
    fn id(&self) -> &str;

    /// Returns the parent key this entity is scoped under
    /// (household id or box id)
    fn scope(&self) -> &str;
}

/// Common result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level errors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DomainError {
    /// Validation failure, caught before any remote call
    Invalid(String),
    NotFound(String),
    Conflict(String),
    /// Network/transport failure talking to the remote store
    Unavailable(String),
    /// The store accepted the call and rejected it
    Internal(String),
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DomainError::Invalid(msg) => write!(f, "Invalid input: {}", msg),
            DomainError::NotFound(msg) => write!(f, "Not found: {}", msg),
            DomainError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            DomainError::Unavailable(msg) => write!(f, "Store unavailable: {}", msg),
            DomainError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for DomainError {}
