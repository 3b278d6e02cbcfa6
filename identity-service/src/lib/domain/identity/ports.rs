use async_trait::async_trait;

use crate::identity::errors::HashingError;
use crate::identity::errors::IdentityError;
use crate::identity::errors::StoreError;
use crate::identity::models::Identity;
use crate::identity::models::IdentityId;
use crate::identity::models::LoginCommand;
use crate::identity::models::LoginOutcome;
use crate::identity::models::RegisterIdentityCommand;
use crate::identity::models::RegisteredIdentity;

/// Port for identity use cases, consumed by the transport layer.
#[async_trait]
pub trait IdentityServicePort: Send + Sync + 'static {
    /// Register a new identity.
    ///
    /// # Arguments
    /// * `command` - Raw username, display name, email and plaintext secret
    ///
    /// # Returns
    /// Identifier assigned by the store
    ///
    /// # Errors
    /// * `BadRequest` - Input violates an identity rule
    /// * `Conflict` - Username or email is already registered
    /// * `Internal` - Hashing or storage failed
    async fn register(
        &self,
        command: RegisterIdentityCommand,
    ) -> Result<RegisteredIdentity, IdentityError>;

    /// Check a login identifier (username or email) and secret.
    ///
    /// # Returns
    /// Outcome of the attempt; unknown identifiers and wrong secrets are
    /// unsuccessful outcomes, not errors
    ///
    /// # Errors
    /// * `Internal` - Storage failed
    async fn authenticate(&self, command: LoginCommand) -> Result<LoginOutcome, IdentityError>;

    /// Retrieve an identity by surrogate key.
    ///
    /// # Errors
    /// * `NotFound` - No identity with this id
    /// * `Internal` - Storage failed
    async fn get_identity(&self, id: IdentityId) -> Result<Identity, IdentityError>;
}

/// Persistence operations for the identity aggregate.
///
/// Lookups report absence as `Ok(None)`. Uniqueness of username and email is
/// enforced here, not by callers.
#[async_trait]
pub trait IdentityRepository: Send + Sync + 'static {
    /// Persist a new identity whose secret is already hashed.
    ///
    /// # Returns
    /// Store-assigned identifier
    ///
    /// # Errors
    /// * `Duplicate` - Username or email is already taken
    /// * `PlaintextSecret` - Secret has not been hashed
    /// * `Database` - Database operation failed
    async fn save(&self, identity: &Identity) -> Result<IdentityId, StoreError>;

    /// Retrieve identity by surrogate key.
    async fn find_by_id(&self, id: IdentityId) -> Result<Option<Identity>, StoreError>;

    /// Retrieve identity whose username equals `username`.
    async fn find_by_username(&self, username: &str) -> Result<Option<Identity>, StoreError>;

    /// Retrieve identity whose username or email equals `login`.
    async fn find_by_username_or_email(&self, login: &str)
        -> Result<Option<Identity>, StoreError>;
}

/// One-way hashing of secrets.
pub trait CredentialHasher: Send + Sync + 'static {
    /// Hash a plaintext secret for storage.
    fn hash(&self, plaintext: &str) -> Result<String, HashingError>;

    /// Whether `plaintext` matches `hash`. Any failure to check counts as a mismatch.
    fn verify(&self, plaintext: &str, hash: &str) -> bool;
}
