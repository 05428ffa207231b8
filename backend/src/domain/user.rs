//! Registered user as stored in the user index.

use serde::{Deserialize, Serialize};

use super::auth::{hash_password, verify_password, Credentials, PasswordHashError};

/// Registered user.
///
/// Serialised as `{"username": ..., "password": ...}` where `password` holds an
/// Argon2 PHC string, never the clear-text value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    username: String,
    password: String,
}

impl User {
    /// Build a user record from registration credentials, hashing the password.
    pub fn register(credentials: &Credentials) -> Result<Self, PasswordHashError> {
        Ok(Self {
            username: credentials.username().to_owned(),
            password: hash_password(credentials.password())?,
        })
    }

    /// Username, also the user document key.
    #[must_use]
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Stored password hash.
    #[must_use]
    pub fn password_hash(&self) -> &str {
        self.password.as_str()
    }

    /// Whether `candidate` matches the stored password hash.
    pub fn verify_password(&self, candidate: &str) -> Result<bool, PasswordHashError> {
        verify_password(&self.password, candidate)
    }
}
