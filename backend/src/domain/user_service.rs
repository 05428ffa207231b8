//! User domain service.
//!
//! Users are stored in the user index keyed by username. Sign-in looks the
//! username up with an exact term query and verifies the submitted password
//! against the stored Argon2 hash. Hashing and verification run on tokio's
//! blocking pool. Registration inserts with create semantics, so a concurrent
//! sign-up for the same username never overwrites the first one.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info, warn};
use zeroize::Zeroizing;

use crate::domain::app_service::map_index_error;
use crate::domain::ports::{SearchIndex, UserAccounts};
use crate::domain::{
    Credentials, Error, IndexName, IndexedDocument, PasswordHashError, SearchQuery, User,
};

const USERNAME_FIELD: &str = "username";

/// User service implementing [`UserAccounts`].
pub struct UserService<I: ?Sized> {
    index: Arc<I>,
}

impl<I: ?Sized> Clone for UserService<I> {
    fn clone(&self) -> Self {
        Self {
            index: Arc::clone(&self.index),
        }
    }
}

impl<I: ?Sized> UserService<I> {
    /// Create the service over a search index.
    pub fn new(index: Arc<I>) -> Self {
        Self { index }
    }
}

impl<I> UserService<I>
where
    I: SearchIndex + ?Sized,
{
    async fn users_named(&self, username: &str) -> Result<(u64, Vec<User>), Error> {
        let hits = self
            .index
            .read(IndexName::User, &SearchQuery::term(USERNAME_FIELD, username))
            .await
            .map_err(map_index_error)?;
        Ok((hits.total(), hits.into_users()))
    }
}

/// Run CPU-bound password work off the async worker.
///
/// Task-locals do not reach the blocking pool, so errors are built here,
/// back inside the request's trace scope.
async fn run_blocking<T, F>(task: F) -> Result<T, Error>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task).await.map_err(|err| {
        error!(error = %err, "password hashing task failed");
        Error::internal(format!("password hashing task failed: {err}"))
    })
}

/// Verify `password` against each stored user until one matches.
fn verify_any(
    users: Vec<User>,
    password: &str,
) -> Vec<(String, Result<bool, PasswordHashError>)> {
    let mut outcomes = Vec::with_capacity(users.len());
    for user in users {
        let outcome = user.verify_password(password);
        let matched = matches!(outcome, Ok(true));
        outcomes.push((user.username().to_owned(), outcome));
        if matched {
            break;
        }
    }
    outcomes
}

#[async_trait]
impl<I> UserAccounts for UserService<I>
where
    I: SearchIndex + ?Sized,
{
    async fn check_user(&self, credentials: &Credentials) -> Result<bool, Error> {
        let (_, users) = self.users_named(credentials.username()).await?;
        if users.is_empty() {
            return Ok(false);
        }
        let password = Zeroizing::new(credentials.password().to_owned());
        let outcomes = run_blocking(move || verify_any(users, &password)).await?;
        for (username, outcome) in outcomes {
            match outcome {
                Ok(true) => {
                    info!(%username, "user logged in");
                    return Ok(true);
                }
                Ok(false) => {}
                Err(err) => {
                    warn!(%username, error = %err, "stored password hash is unusable");
                }
            }
        }
        Ok(false)
    }

    async fn add_user(&self, credentials: &Credentials) -> Result<bool, Error> {
        let (total, _) = self.users_named(credentials.username()).await?;
        if total > 0 {
            info!(username = credentials.username(), "username already registered");
            return Ok(false);
        }

        let registration = credentials.clone();
        let user = run_blocking(move || User::register(&registration))
            .await?
            .map_err(|err| {
                error!(error = %err, "failed to hash password");
                Error::internal(err.to_string())
            })?;
        let created = self
            .index
            .create(
                IndexName::User,
                user.username(),
                &IndexedDocument::User(user.clone()),
            )
            .await
            .map_err(|err| {
                error!(username = user.username(), error = %err, "failed to save user");
                map_index_error(err)
            })?;

        if created {
            info!(username = user.username(), "user registered");
        } else {
            info!(username = user.username(), "username registered concurrently");
        }
        Ok(created)
    }
}

#[cfg(test)]
#[path = "user_service_tests.rs"]
mod tests;
