use std::fmt;

use chrono::DateTime;
use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::identity::errors::ValidationError;

static USERNAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9]{5,}$").expect("username pattern is valid"));

// Lowercase only; mixed-case addresses are rejected.
static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z0-9._%+\-]+@[a-z0-9.\-]+\.[a-z]{2,4}$").expect("email pattern is valid")
});

// Each rule must match somewhere in the secret. The last one is "neither a digit
// nor a word character", spelled out in ASCII.
static SECRET_RULES: Lazy<[Regex; 5]> = Lazy::new(|| {
    [r".{7,}", r"[a-z]", r"[A-Z]", r"[0-9]", r"[^0-9A-Za-z_]"]
        .map(|rule| Regex::new(rule).expect("secret rule is valid"))
});

/// Identity aggregate entity.
///
/// Represents one user account of the chat service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: IdentityId,
    pub username: Username,
    pub display_name: Option<String>,
    pub email: EmailAddress,
    pub secret: Secret,
    pub created_at: DateTime<Utc>,
}

impl Identity {
    /// Build a new identity from raw input, stamped with the current time.
    ///
    /// # Errors
    /// * `InvalidUsername` - Username is not at least 5 ASCII alphanumerics
    /// * `InvalidEmail` - Email does not match the accepted shape
    /// * `InsecureSecret` - Secret fails one of the strength rules
    pub fn new(
        id: IdentityId,
        username: String,
        display_name: Option<String>,
        email: String,
        secret: String,
    ) -> Result<Self, ValidationError> {
        Self::new_at(id, username, display_name, email, secret, Utc::now())
    }

    /// Same as [`Identity::new`] with an explicit creation timestamp.
    pub fn new_at(
        id: IdentityId,
        username: String,
        display_name: Option<String>,
        email: String,
        secret: String,
        created_at: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        let username = Username::new(username)?;
        let email = EmailAddress::new(email)?;
        let secret = Secret::plaintext(secret)?;

        Ok(Self {
            id,
            username,
            display_name,
            email,
            secret,
            created_at,
        })
    }

    /// Rebuild a persisted identity.
    ///
    /// Username and email shapes are re-checked; the secret is taken as an
    /// already hashed value.
    pub fn restore(
        id: IdentityId,
        username: String,
        display_name: Option<String>,
        email: String,
        secret_hash: String,
        created_at: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            id,
            username: Username::new(username)?,
            display_name,
            email: EmailAddress::new(email)?,
            secret: Secret::Hashed(secret_hash),
            created_at,
        })
    }

    /// Replace the plaintext secret with its hashed form.
    ///
    /// Consumes the identity so the swap can only happen on the way to the store.
    pub fn with_hashed_secret(self, secret_hash: String) -> Self {
        Self {
            secret: Secret::Hashed(secret_hash),
            ..self
        }
    }
}

/// Surrogate key assigned by the store.
///
/// `IdentityId::UNASSIGNED` marks an identity that has not been persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IdentityId(pub i32);

impl IdentityId {
    pub const UNASSIGNED: IdentityId = IdentityId(0);

    pub fn is_assigned(&self) -> bool {
        self.0 != 0
    }
}

impl fmt::Display for IdentityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Username value type
///
/// At least 5 characters, ASCII letters and digits only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Username(String);

impl Username {
    pub fn new(username: String) -> Result<Self, ValidationError> {
        if USERNAME_PATTERN.is_match(&username) {
            Ok(Self(username))
        } else {
            Err(ValidationError::InvalidUsername)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    pub fn new(email: String) -> Result<Self, ValidationError> {
        if Self::is_email_shaped(&email) {
            Ok(Self(email))
        } else {
            Err(ValidationError::InvalidEmail)
        }
    }

    /// Whether `candidate` has the shape of an accepted email address.
    ///
    /// Used to classify login identifiers without rejecting them.
    pub fn is_email_shaped(candidate: &str) -> bool {
        EMAIL_PATTERN.is_match(candidate)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// User secret, either as submitted or as stored.
#[derive(Clone, PartialEq, Eq)]
pub enum Secret {
    Plaintext(String),
    Hashed(String),
}

impl Secret {
    /// Accept a plaintext secret that passes every strength rule.
    pub fn plaintext(secret: String) -> Result<Self, ValidationError> {
        if SECRET_RULES.iter().all(|rule| rule.is_match(&secret)) {
            Ok(Secret::Plaintext(secret))
        } else {
            Err(ValidationError::InsecureSecret)
        }
    }

    pub fn plaintext_value(&self) -> Option<&str> {
        match self {
            Secret::Plaintext(value) => Some(value),
            Secret::Hashed(_) => None,
        }
    }

    pub fn hashed_value(&self) -> Option<&str> {
        match self {
            Secret::Hashed(value) => Some(value),
            Secret::Plaintext(_) => None,
        }
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Secret::Plaintext(_) => f.write_str("Secret::Plaintext(***)"),
            Secret::Hashed(_) => f.write_str("Secret::Hashed(***)"),
        }
    }
}

/// Command to register a new identity from raw transport input
#[derive(Debug, Clone)]
pub struct RegisterIdentityCommand {
    pub username: String,
    pub display_name: Option<String>,
    pub email: String,
    pub secret: String,
}

/// Successful registration result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisteredIdentity {
    pub created_id: IdentityId,
}

/// Command to authenticate with a username or an email
#[derive(Debug, Clone)]
pub struct LoginCommand {
    pub login: String,
    pub secret: String,
}

/// Why a login attempt did not succeed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginFailure {
    UsernameNotFound,
    EmailNotFound,
    SecretMismatch,
}

impl LoginFailure {
    pub fn code(&self) -> u8 {
        match self {
            LoginFailure::UsernameNotFound => 0,
            LoginFailure::EmailNotFound => 1,
            LoginFailure::SecretMismatch => 2,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            LoginFailure::UsernameNotFound => "user login does not exist",
            LoginFailure::EmailNotFound => "email does not exist",
            LoginFailure::SecretMismatch => "secret does not match",
        }
    }
}

/// Result of an authentication attempt.
///
/// A failed login is a normal outcome, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoginOutcome {
    pub success: bool,
    pub reason: Option<LoginFailure>,
}

impl LoginOutcome {
    pub fn succeeded() -> Self {
        Self {
            success: true,
            reason: None,
        }
    }

    pub fn failed(reason: LoginFailure) -> Self {
        Self {
            success: false,
            reason: Some(reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const USERNAME: &str = "eduardolima806";
    const DISPLAY_NAME: &str = "Eduardo Lima";
    const EMAIL: &str = "eduardolima.dev.io@gmail.com";
    const SECRET: &str = "Pa$$w0rd";

    fn build(username: &str, email: &str, secret: &str) -> Result<Identity, ValidationError> {
        Identity::new(
            IdentityId(1),
            username.to_string(),
            Some(DISPLAY_NAME.to_string()),
            email.to_string(),
            secret.to_string(),
        )
    }

    #[test]
    fn test_valid_identity() {
        let identity = build(USERNAME, EMAIL, SECRET).unwrap();

        assert_eq!(identity.id, IdentityId(1));
        assert_eq!(identity.username.as_str(), USERNAME);
        assert_eq!(identity.display_name.as_deref(), Some(DISPLAY_NAME));
        assert_eq!(identity.email.as_str(), EMAIL);
        assert_eq!(identity.secret.plaintext_value(), Some(SECRET));
    }

    #[test]
    fn test_username_rules() {
        assert_eq!(build("ed12", EMAIL, SECRET), Err(ValidationError::InvalidUsername));
        assert_eq!(build("ed_lima", EMAIL, SECRET), Err(ValidationError::InvalidUsername));
        assert_eq!(build("édouard", EMAIL, SECRET), Err(ValidationError::InvalidUsername));
        assert!(build("edu12", EMAIL, SECRET).is_ok());
    }

    #[test]
    fn test_email_rules() {
        assert_eq!(
            build(USERNAME, "invalidmail.com", SECRET),
            Err(ValidationError::InvalidEmail)
        );
        assert_eq!(
            build(USERNAME, "someone@company.technology", SECRET),
            Err(ValidationError::InvalidEmail)
        );
        assert!(build(USERNAME, "valid@company.com", SECRET).is_ok());
    }

    #[test]
    fn test_email_pattern_is_lowercase_only() {
        assert_eq!(
            build(USERNAME, "Valid@Company.com", SECRET),
            Err(ValidationError::InvalidEmail)
        );
    }

    #[test]
    fn test_secret_rules() {
        for weak in ["password123", "P4$$wo", "p4$$word", "P4$$WORD", "Pa$$word", "P4ssw0rd"] {
            assert_eq!(
                build(USERNAME, EMAIL, weak),
                Err(ValidationError::InsecureSecret),
                "{weak} should be rejected"
            );
        }
        assert!(build(USERNAME, EMAIL, "P4$$word").is_ok());
    }

    #[test]
    fn test_underscore_is_not_a_special_character() {
        assert_eq!(
            build(USERNAME, EMAIL, "P4ss_word"),
            Err(ValidationError::InsecureSecret)
        );
    }

    #[test]
    fn test_first_failing_rule_wins() {
        assert_eq!(
            build("ed12", "invalidmail.com", "weak"),
            Err(ValidationError::InvalidUsername)
        );
        assert_eq!(
            build(USERNAME, "invalidmail.com", "weak"),
            Err(ValidationError::InvalidEmail)
        );
    }

    #[test]
    fn test_with_hashed_secret_replaces_plaintext() {
        let identity = build(USERNAME, EMAIL, SECRET)
            .unwrap()
            .with_hashed_secret("$argon2id$hash".to_string());

        assert_eq!(identity.secret.plaintext_value(), None);
        assert_eq!(identity.secret.hashed_value(), Some("$argon2id$hash"));
    }

    #[test]
    fn test_restore_skips_secret_rules() {
        let created_at = Utc::now();
        let identity = Identity::restore(
            IdentityId(7),
            USERNAME.to_string(),
            None,
            EMAIL.to_string(),
            "hash".to_string(),
            created_at,
        )
        .unwrap();

        assert_eq!(identity.secret.hashed_value(), Some("hash"));
        assert_eq!(identity.created_at, created_at);
    }

    #[test]
    fn test_secret_debug_is_redacted() {
        let secret = Secret::plaintext(SECRET.to_string()).unwrap();
        assert!(!format!("{:?}", secret).contains(SECRET));
    }

    #[test]
    fn test_login_failure_codes() {
        assert_eq!(LoginFailure::UsernameNotFound.code(), 0);
        assert_eq!(LoginFailure::EmailNotFound.code(), 1);
        assert_eq!(LoginFailure::SecretMismatch.code(), 2);
    }
}
