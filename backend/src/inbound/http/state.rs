//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{AppCatalogue, UserAccounts};
use crate::inbound::http::upload_form::UploadLimits;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// App upload, search, and checkout use-cases.
    pub apps: Arc<dyn AppCatalogue>,
    /// Registration and credential checks.
    pub users: Arc<dyn UserAccounts>,
    /// Size caps for `POST /upload` parts.
    pub upload_limits: UploadLimits,
}

impl HttpState {
    /// Construct state from the driving ports.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use appstore::domain::ports::FixturePaymentGateway;
    /// use appstore::domain::{AppService, UserService};
    /// use appstore::inbound::http::state::HttpState;
    /// use appstore::outbound::memory::{InMemoryMediaStore, InMemorySearchIndex};
    ///
    /// let index = Arc::new(InMemorySearchIndex::default());
    /// let apps = AppService::new(
    ///     index.clone(),
    ///     Arc::new(InMemoryMediaStore::default()),
    ///     Arc::new(FixturePaymentGateway),
    /// );
    /// let state = HttpState::new(Arc::new(apps), Arc::new(UserService::new(index)));
    /// let _apps = state.apps.clone();
    /// ```
    pub fn new(apps: Arc<dyn AppCatalogue>, users: Arc<dyn UserAccounts>) -> Self {
        Self {
            apps,
            users,
            upload_limits: UploadLimits::default(),
        }
    }

    /// Replace the default upload size caps.
    #[must_use]
    pub fn with_upload_limits(mut self, upload_limits: UploadLimits) -> Self {
        self.upload_limits = upload_limits;
        self
    }
}
