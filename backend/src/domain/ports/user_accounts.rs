//! Driving port for registration and credential checks.

use async_trait::async_trait;

use crate::domain::{Credentials, Error};

/// Domain use-case port for user accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserAccounts: Send + Sync {
    /// Whether a user with these credentials exists.
    async fn check_user(&self, credentials: &Credentials) -> Result<bool, Error>;

    /// Register a new user; `Ok(false)` when the username is already taken.
    async fn add_user(&self, credentials: &Credentials) -> Result<bool, Error>;
}
