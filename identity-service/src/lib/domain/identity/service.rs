use std::sync::Arc;

use async_trait::async_trait;

use crate::identity::errors::IdentityError;
use crate::identity::errors::StoreError;
use crate::identity::errors::UniqueField;
use crate::identity::models::EmailAddress;
use crate::identity::models::Identity;
use crate::identity::models::IdentityId;
use crate::identity::models::LoginCommand;
use crate::identity::models::LoginFailure;
use crate::identity::models::LoginOutcome;
use crate::identity::models::RegisterIdentityCommand;
use crate::identity::models::RegisteredIdentity;
use crate::identity::ports::CredentialHasher;
use crate::identity::ports::IdentityRepository;
use crate::identity::ports::IdentityServicePort;

/// Domain service implementation for identity operations.
///
/// Concrete implementation of IdentityServicePort with dependency injection.
pub struct IdentityService<IR, CH>
where
    IR: IdentityRepository,
    CH: CredentialHasher,
{
    repository: Arc<IR>,
    hasher: Arc<CH>,
}

impl<IR, CH> IdentityService<IR, CH>
where
    IR: IdentityRepository,
    CH: CredentialHasher,
{
    /// Create a new identity service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - Identity persistence implementation
    /// * `hasher` - Secret hashing implementation
    pub fn new(repository: Arc<IR>, hasher: Arc<CH>) -> Self {
        Self { repository, hasher }
    }

    // Best-effort early rejection; the store's constraints remain the source of truth.
    async fn ensure_not_registered(&self, identity: &Identity) -> Result<(), IdentityError> {
        let username = identity.username.as_str();
        let existing = self
            .repository
            .find_by_username(username)
            .await
            .map_err(store_failure(FETCH_FAILED))?;

        if existing.is_some_and(|found| found.username.as_str() == username) {
            return Err(duplicate(UniqueField::Username, username));
        }

        let email = identity.email.as_str();
        let existing = self
            .repository
            .find_by_username_or_email(email)
            .await
            .map_err(store_failure(FETCH_FAILED))?;

        if existing.is_some_and(|found| found.email.as_str() == email) {
            return Err(duplicate(UniqueField::Email, email));
        }

        Ok(())
    }
}

#[async_trait]
impl<IR, CH> IdentityServicePort for IdentityService<IR, CH>
where
    IR: IdentityRepository,
    CH: CredentialHasher,
{
    async fn register(
        &self,
        command: RegisterIdentityCommand,
    ) -> Result<RegisteredIdentity, IdentityError> {
        let identity = Identity::new(
            IdentityId::UNASSIGNED,
            command.username,
            command.display_name,
            command.email,
            command.secret,
        )?;

        self.ensure_not_registered(&identity).await?;

        let secret_hash = identity
            .secret
            .plaintext_value()
            .ok_or_else(|| IdentityError::internal("could not encrypt secret"))
            .and_then(|plaintext| {
                self.hasher.hash(plaintext).map_err(|e| {
                    tracing::error!(username = %identity.username, error = %e, "Secret hashing failed");
                    IdentityError::internal("could not encrypt secret")
                })
            })?;
        let identity = identity.with_hashed_secret(secret_hash);

        let created_id = self.repository.save(&identity).await.map_err(|e| match e {
            StoreError::Duplicate { field, value } => duplicate(field, &value),
            other => store_failure(SAVE_FAILED)(other),
        })?;

        tracing::info!(
            identity_id = %created_id,
            username = %identity.username,
            "Identity registered"
        );

        Ok(RegisteredIdentity { created_id })
    }

    async fn authenticate(&self, command: LoginCommand) -> Result<LoginOutcome, IdentityError> {
        let found = self
            .repository
            .find_by_username_or_email(&command.login)
            .await
            .map_err(store_failure(FETCH_FAILED))?;

        let Some(identity) = found else {
            let reason = if EmailAddress::is_email_shaped(&command.login) {
                LoginFailure::EmailNotFound
            } else {
                LoginFailure::UsernameNotFound
            };
            tracing::debug!(reason = reason.description(), "Login rejected");
            return Ok(LoginOutcome::failed(reason));
        };

        let verified = identity
            .secret
            .hashed_value()
            .is_some_and(|hash| self.hasher.verify(&command.secret, hash));

        if !verified {
            tracing::debug!(identity_id = %identity.id, "Login rejected: secret mismatch");
            return Ok(LoginOutcome::failed(LoginFailure::SecretMismatch));
        }

        tracing::info!(identity_id = %identity.id, "Login succeeded");
        Ok(LoginOutcome::succeeded())
    }

    async fn get_identity(&self, id: IdentityId) -> Result<Identity, IdentityError> {
        self.repository
            .find_by_id(id)
            .await
            .map_err(store_failure(FETCH_FAILED))?
            .ok_or_else(|| IdentityError::not_found(format!("identity not found: {}", id)))
    }
}

fn duplicate(field: UniqueField, value: &str) -> IdentityError {
    tracing::warn!(%field, "Registration rejected: duplicate {}", field);
    match field {
        UniqueField::Username => IdentityError::conflict("username already exists"),
        UniqueField::Email => IdentityError::conflict(format!(
            "an account already exists with this email: {}",
            value
        )),
    }
}

const FETCH_FAILED: &str = "could not fetch identity";
const SAVE_FAILED: &str = "could not save identity";

/// Store details stay in the logs; callers only see `message`.
fn store_failure(message: &'static str) -> impl Fn(StoreError) -> IdentityError {
    move |err| {
        tracing::error!(error = %err, "Identity store failure: {}", message);
        IdentityError::internal(message)
    }
}
