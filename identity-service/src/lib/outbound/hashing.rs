use credentials::Argon2Hasher;
use credentials::CredentialError;
use credentials::HashingCost;

use crate::identity::errors::HashingError;
use crate::identity::ports::CredentialHasher;

/// CredentialHasher adapter over the shared Argon2id primitive.
#[derive(Clone)]
pub struct Argon2CredentialHasher {
    inner: Argon2Hasher,
}

impl Argon2CredentialHasher {
    pub fn new(cost: HashingCost) -> Result<Self, CredentialError> {
        Ok(Self {
            inner: Argon2Hasher::new(cost)?,
        })
    }
}

impl CredentialHasher for Argon2CredentialHasher {
    fn hash(&self, plaintext: &str) -> Result<String, HashingError> {
        self.inner
            .hash(plaintext)
            .map_err(|e| HashingError(e.to_string()))
    }

    fn verify(&self, plaintext: &str, hash: &str) -> bool {
        self.inner.verify(plaintext, hash).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Stored secret hash could not be checked");
            false
        })
    }
}
