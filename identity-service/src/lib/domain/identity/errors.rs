use std::fmt;

use thiserror::Error;

/// Error for Identity construction failures.
///
/// Rules are checked username, email, then secret; only the first failure is reported.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("username must have at least 5 alphanumeric characters")]
    InvalidUsername,

    #[error("email is not valid")]
    InvalidEmail,

    #[error("secret is not secure")]
    InsecureSecret,
}

/// Error for the credential hashing port
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Secret hashing failed: {0}")]
pub struct HashingError(pub String);

/// Error for identity store operations.
///
/// "Not found" is not an error: lookups return `Ok(None)`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Duplicate {field}: {value}")]
    Duplicate { field: UniqueField, value: String },

    #[error("Refusing to persist a plaintext secret")]
    PlaintextSecret,

    #[error("Stored identity is invalid: {0}")]
    Corrupted(#[from] ValidationError),

    #[error("Database error: {0}")]
    Database(String),
}

/// Column guarded by a store uniqueness constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    Username,
    Email,
}

impl fmt::Display for UniqueField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UniqueField::Username => f.write_str("username"),
            UniqueField::Email => f.write_str("email"),
        }
    }
}

/// Closed set of error categories shared with the transport layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    BadRequest,
    Conflict,
    Internal,
    NotFound,
    Unauthorized,
    /// Reserved for future use cases
    InsufficientFund,
}

impl ErrorKind {
    /// Stable wire code for this kind.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "BAD_REQUEST",
            ErrorKind::Conflict => "CONFLICT",
            ErrorKind::Internal => "INTERNAL_SERVER_ERROR",
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::Unauthorized => "UNAUTHORIZED",
            ErrorKind::InsufficientFund => "INSUFFICIENT_FUND",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Top-level error for identity operations: one kind plus a message.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{kind}: {message}")]
pub struct IdentityError {
    kind: ErrorKind,
    message: String,
}

impl IdentityError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::BadRequest, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<ValidationError> for IdentityError {
    fn from(err: ValidationError) -> Self {
        IdentityError::bad_request(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_is_bad_request() {
        let err = IdentityError::from(ValidationError::InsecureSecret);

        assert_eq!(err.kind(), ErrorKind::BadRequest);
        assert_eq!(err.message(), "secret is not secure");
    }

    #[test]
    fn test_error_display_carries_code_and_message() {
        let err = IdentityError::conflict("username already exists");
        assert_eq!(err.to_string(), "CONFLICT: username already exists");
    }

    #[test]
    fn test_store_error_keeps_field_name() {
        let err = StoreError::Duplicate {
            field: UniqueField::Email,
            value: "a@b.com".to_string(),
        };
        assert_eq!(err.to_string(), "Duplicate email: a@b.com");
    }
}
