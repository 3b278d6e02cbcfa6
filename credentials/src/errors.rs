use thiserror::Error;

/// Error type for credential operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CredentialError {
    #[error("Invalid hashing cost: {0}")]
    InvalidCost(String),

    #[error("Hashing failed: {0}")]
    HashingFailed(String),

    #[error("Malformed hash: {0}")]
    MalformedHash(String),
}
