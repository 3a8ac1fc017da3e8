//! Vault error taxonomy
//!
//! Every core operation returns one of these kinds instead of terminating
//! the process. The front end decides messaging and retry prompting.

use thiserror::Error;

/// Vault-specific errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VaultError {
    /// Input failed a format, strength, or uniqueness rule
    #[error("Invalid {field}: {rule}")]
    Validation {
        field: &'static str,
        rule: &'static str,
    },

    /// Referenced key does not exist
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Attempted to create a key that already exists
    #[error("Key already exists: {0}")]
    AlreadyExists(String),

    /// Underlying storage read or write failed
    #[error("Storage error: {0}")]
    Persistence(String),
}
