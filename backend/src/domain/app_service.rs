//! App domain service.
//!
//! Sequences the payment provider, the object store, and the search index to
//! implement the [`AppCatalogue`] driving port. Steps run in order and stop at
//! the first failure; earlier side effects are not undone.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info, warn};

use crate::domain::ports::{
    AppCatalogue, MediaStore, MediaStoreError, MediaUpload, PaymentGateway, PaymentGatewayError,
    SearchIndex, SearchIndexError,
};
use crate::domain::{
    App, AppListing, Error, IndexName, IndexedDocument, MatchOperator, SearchQuery,
    ZeroTermsPolicy,
};

const APP_ID_FIELD: &str = "id";
const TITLE_FIELD: &str = "title";
const DESCRIPTION_FIELD: &str = "description";

pub(crate) fn map_index_error(error: SearchIndexError) -> Error {
    match error {
        SearchIndexError::Transport { .. } | SearchIndexError::Timeout { .. } => {
            Error::service_unavailable(error.to_string())
        }
        SearchIndexError::Rejected { .. } | SearchIndexError::Decode { .. } => {
            Error::internal(error.to_string())
        }
    }
}

fn map_media_error(error: MediaStoreError) -> Error {
    match error {
        MediaStoreError::Transport { .. } | MediaStoreError::Timeout { .. } => {
            Error::service_unavailable(error.to_string())
        }
        MediaStoreError::Rejected { .. } | MediaStoreError::Decode { .. } => {
            Error::internal(error.to_string())
        }
    }
}

fn map_payment_error(error: PaymentGatewayError) -> Error {
    match error {
        PaymentGatewayError::Transport { .. } | PaymentGatewayError::Timeout { .. } => {
            Error::service_unavailable(error.to_string())
        }
        PaymentGatewayError::Rejected { .. } | PaymentGatewayError::Decode { .. } => {
            Error::internal(error.to_string())
        }
    }
}

/// Single-field text match: every term required, empty text matches all.
fn field_match(field: &str, text: &str) -> SearchQuery {
    let zero_terms = if text.is_empty() {
        ZeroTermsPolicy::All
    } else {
        ZeroTermsPolicy::None
    };
    SearchQuery::matching(field, text, MatchOperator::And, zero_terms)
}

/// Query used by [`AppCatalogue::search_apps`].
///
/// An empty title searches the description alone, an empty description
/// searches the title alone, and otherwise both fields must match.
pub(crate) fn app_search_query(title: &str, description: &str) -> SearchQuery {
    if title.is_empty() {
        return field_match(DESCRIPTION_FIELD, description);
    }
    if description.is_empty() {
        return field_match(TITLE_FIELD, title);
    }
    SearchQuery::all_of(vec![
        field_match(TITLE_FIELD, title),
        field_match(DESCRIPTION_FIELD, description),
    ])
}

/// App service implementing [`AppCatalogue`].
pub struct AppService<I: ?Sized, M: ?Sized, P: ?Sized> {
    index: Arc<I>,
    media: Arc<M>,
    payments: Arc<P>,
}

impl<I: ?Sized, M: ?Sized, P: ?Sized> Clone for AppService<I, M, P> {
    fn clone(&self) -> Self {
        Self {
            index: Arc::clone(&self.index),
            media: Arc::clone(&self.media),
            payments: Arc::clone(&self.payments),
        }
    }
}

impl<I: ?Sized, M: ?Sized, P: ?Sized> AppService<I, M, P> {
    /// Create the service from its three collaborators.
    pub fn new(index: Arc<I>, media: Arc<M>, payments: Arc<P>) -> Self {
        Self {
            index,
            media,
            payments,
        }
    }
}

impl<I, M, P> AppService<I, M, P>
where
    I: SearchIndex + ?Sized,
    M: ?Sized,
    P: ?Sized,
{
    async fn read_apps(&self, query: &SearchQuery) -> Result<Vec<App>, Error> {
        let hits = self
            .index
            .read(IndexName::App, query)
            .await
            .map_err(map_index_error)?;
        Ok(hits.into_apps())
    }
}

#[async_trait]
impl<I, M, P> AppCatalogue for AppService<I, M, P>
where
    I: SearchIndex + ?Sized,
    M: MediaStore + ?Sized,
    P: PaymentGateway + ?Sized,
{
    async fn save_app(&self, listing: AppListing, media: MediaUpload) -> Result<App, Error> {
        let unit_amount = listing.unit_amount().ok_or_else(|| {
            Error::invalid_request(format!("price {} is out of range", listing.price()))
        })?;

        let product = self
            .payments
            .create_product_with_price(listing.title(), listing.description(), unit_amount)
            .await
            .map_err(|err| {
                error!(app_id = %listing.id(), error = %err, "failed to create payment product and price");
                map_payment_error(err)
            })?;

        let link = self
            .media
            .store(listing.id().as_str(), media)
            .await
            .map_err(|err| {
                error!(
                    app_id = %listing.id(),
                    product_id = %product.product_id,
                    error = %err,
                    "failed to upload media; payment product left in place"
                );
                map_media_error(err)
            })?;

        let app = listing.publish(product, link);
        self.index
            .write(
                IndexName::App,
                app.id().as_str(),
                &IndexedDocument::App(app.clone()),
            )
            .await
            .map_err(|err| {
                error!(app_id = %app.id(), error = %err, "failed to save app to the app index");
                map_index_error(err)
            })?;

        info!(app_id = %app.id(), "app saved to the app index");
        Ok(app)
    }

    async fn search_apps(&self, title: &str, description: &str) -> Result<Vec<App>, Error> {
        self.read_apps(&app_search_query(title, description)).await
    }

    async fn search_app_by_id(&self, app_id: &str) -> Result<Option<App>, Error> {
        let mut apps = self
            .read_apps(&SearchQuery::term(APP_ID_FIELD, app_id))
            .await?;
        if apps.len() > 1 {
            warn!(app_id, hits = apps.len(), "app id matched more than one document");
        }
        if apps.len() == 1 {
            Ok(apps.pop())
        } else {
            Ok(None)
        }
    }

    async fn checkout_app(&self, origin: &str, app_id: &str) -> Result<String, Error> {
        let app = self
            .search_app_by_id(app_id)
            .await?
            .ok_or_else(|| Error::not_found("unable to find app in the search index"))?;

        self.payments
            .create_checkout_session(origin, app.price_id())
            .await
            .map_err(|err| {
                error!(app_id, error = %err, "failed to create checkout session");
                map_payment_error(err)
            })
    }
}

#[cfg(test)]
#[path = "app_service_tests.rs"]
mod tests;
