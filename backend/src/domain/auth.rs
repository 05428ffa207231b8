//! Credentials submitted for sign-up and sign-in, plus password hashing.
//!
//! Inbound adapters build [`Credentials`] from raw strings before calling the
//! user accounts port. Stored users only ever see an Argon2 PHC string.

use std::fmt;

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use rand_core::OsRng;
use thiserror::Error;
use zeroize::Zeroizing;

/// Validation errors raised for blank credential parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialsValidationError {
    /// Username was missing or blank once trimmed.
    EmptyUsername,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for CredentialsValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for CredentialsValidationError {}

/// Username and clear-text password as supplied by the caller.
///
/// ## Invariants
/// - `username` is trimmed and non-empty.
/// - `password` is non-empty; surrounding whitespace is preserved.
///
/// # Examples
/// ```
/// use appstore::domain::Credentials;
///
/// let creds = Credentials::try_from_parts(" alice ", "hunter2").expect("valid");
/// assert_eq!(creds.username(), "alice");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: Zeroizing<String>,
}

impl Credentials {
    /// Validate raw username/password inputs.
    pub fn try_from_parts(
        username: &str,
        password: &str,
    ) -> Result<Self, CredentialsValidationError> {
        let normalized = username.trim();
        if normalized.is_empty() {
            return Err(CredentialsValidationError::EmptyUsername);
        }
        if password.is_empty() {
            return Err(CredentialsValidationError::EmptyPassword);
        }
        Ok(Self {
            username: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Username used as the user document key.
    #[must_use]
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Clear-text password.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Failures raised while hashing or verifying a password.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordHashError {
    /// Hashing the supplied password failed.
    #[error("password hashing failed: {0}")]
    Hash(String),
    /// The stored credential is not a valid PHC string.
    #[error("stored password hash is malformed: {0}")]
    Malformed(String),
}

/// Hash `password` into an Argon2 PHC string with a random salt.
pub fn hash_password(password: &str) -> Result<String, PasswordHashError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| PasswordHashError::Hash(err.to_string()))
}

/// Check `candidate` against a stored PHC string.
pub fn verify_password(stored_hash: &str, candidate: &str) -> Result<bool, PasswordHashError> {
    let parsed =
        PasswordHash::new(stored_hash).map_err(|err| PasswordHashError::Malformed(err.to_string()))?;
    match Argon2::default().verify_password(candidate.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(err) => Err(PasswordHashError::Hash(err.to_string())),
    }
}
