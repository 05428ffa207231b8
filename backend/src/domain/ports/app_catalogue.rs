//! Driving port for the app upload, search, and checkout use-cases.
//!
//! Inbound adapters depend on this trait only, so handler tests substitute a
//! double instead of wiring the index, object store, and payment provider.

use async_trait::async_trait;

use crate::domain::{App, AppListing, Error};

use super::MediaUpload;

/// Domain use-case port for apps.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AppCatalogue: Send + Sync {
    /// Create the payment product, upload the media, then index the app.
    async fn save_app(&self, listing: AppListing, media: MediaUpload) -> Result<App, Error>;

    /// Full-text search on title and/or description.
    async fn search_apps(&self, title: &str, description: &str) -> Result<Vec<App>, Error>;

    /// Exact lookup by identifier; `None` unless exactly one app matches.
    async fn search_app_by_id(&self, app_id: &str) -> Result<Option<App>, Error>;

    /// Start a hosted checkout for the app and return the session URL.
    async fn checkout_app(&self, origin: &str, app_id: &str) -> Result<String, Error>;
}
