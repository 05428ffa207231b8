//! Adapter selection for the driven ports.
//!
//! Each backend uses its HTTP adapter when configured and otherwise falls
//! back to an in-process implementation, so the service runs locally
//! without any external system.

use std::io;
use std::sync::Arc;

use reqwest::Url;
use tracing::{info, warn};

use appstore::domain::IndexName;
use appstore::domain::ports::{FixturePaymentGateway, MediaStore, PaymentGateway, SearchIndex};
use appstore::outbound::elasticsearch::ElasticsearchIndex;
use appstore::outbound::gcs::GcsMediaStore;
use appstore::outbound::memory::{InMemoryMediaStore, InMemorySearchIndex};
use appstore::outbound::stripe::StripeGateway;

use super::settings::AppSettings;

/// Driven port implementations shared by the services.
pub struct Backends {
    /// App and user document index.
    pub index: Arc<dyn SearchIndex>,
    /// Object store for uploaded media.
    pub media: Arc<dyn MediaStore>,
    /// Payment provider for products and checkout sessions.
    pub payments: Arc<dyn PaymentGateway>,
}

fn parse_url(setting: &str, value: &str) -> io::Result<Url> {
    Url::parse(value).map_err(|err| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{setting} is not a valid URL: {err}"),
        )
    })
}

fn client_error(adapter: &str, err: &reqwest::Error) -> io::Error {
    io::Error::other(format!("failed to build {adapter} client: {err}"))
}

fn build_index(settings: &AppSettings) -> io::Result<Arc<dyn SearchIndex>> {
    let Some(url) = settings.elasticsearch_url.as_deref() else {
        warn!("no Elasticsearch URL configured; using the in-memory index");
        return Ok(Arc::new(InMemorySearchIndex::default()));
    };
    let mut index = ElasticsearchIndex::new(
        parse_url("elasticsearch_url", url)?,
        settings.request_timeout(),
    )
    .map_err(|err| client_error("Elasticsearch", &err))?
    .with_max_hits(settings.elasticsearch_max_hits());
    if let Some(username) = settings.elasticsearch_username.as_deref() {
        let password = settings.elasticsearch_password.as_deref().unwrap_or_default();
        index = index.with_basic_auth(username, password);
    }
    info!(%url, "using Elasticsearch index");
    Ok(Arc::new(index))
}

fn build_media(settings: &AppSettings) -> io::Result<Arc<dyn MediaStore>> {
    let Some(bucket) = settings.gcs_bucket.as_deref() else {
        warn!("no Cloud Storage bucket configured; using the in-memory media store");
        return Ok(Arc::new(InMemoryMediaStore::default()));
    };
    let mut store = GcsMediaStore::new(
        parse_url("gcs_endpoint", settings.gcs_endpoint())?,
        bucket,
        settings.request_timeout(),
    )
    .map_err(|err| client_error("Cloud Storage", &err))?;
    if let Some(token) = settings.gcs_token.as_deref() {
        store = store.with_bearer_token(token);
    }
    info!(%bucket, "using Cloud Storage media store");
    Ok(Arc::new(store))
}

fn build_payments(settings: &AppSettings) -> io::Result<Arc<dyn PaymentGateway>> {
    let Some(secret_key) = settings.stripe_secret_key.as_deref() else {
        warn!("no Stripe secret key configured; using the fixture payment gateway");
        return Ok(Arc::new(FixturePaymentGateway));
    };
    let gateway = StripeGateway::new(
        parse_url("stripe_endpoint", settings.stripe_endpoint())?,
        secret_key,
        settings.request_timeout(),
    )
    .map_err(|err| client_error("Stripe", &err))?
    .with_currency(settings.stripe_currency());
    info!(currency = settings.stripe_currency(), "using Stripe payment gateway");
    Ok(Arc::new(gateway))
}

/// Build every driven port from `settings`.
///
/// # Errors
///
/// Returns [`io::Error`] when a configured URL is invalid or an HTTP client
/// cannot be built.
pub fn build_backends(settings: &AppSettings) -> io::Result<Backends> {
    Ok(Backends {
        index: build_index(settings)?,
        media: build_media(settings)?,
        payments: build_payments(settings)?,
    })
}

/// Create every index the services write to.
///
/// # Errors
///
/// Returns [`io::Error`] when the index backend refuses or is unreachable.
pub async fn ensure_indices(index: &dyn SearchIndex) -> io::Result<()> {
    for name in IndexName::ALL {
        index.ensure_index(name).await.map_err(|err| {
            io::Error::other(format!("failed to prepare {name} index: {err}"))
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use appstore::domain::SearchQuery;

    #[test]
    fn invalid_url_is_invalid_input() {
        let err = parse_url("elasticsearch_url", "not a url").expect_err("invalid");
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
        assert!(err.to_string().contains("elasticsearch_url"));
    }

    #[tokio::test]
    async fn ensure_indices_prepares_app_and_user() {
        let index = InMemorySearchIndex::default();
        ensure_indices(&index).await.expect("in-memory indices");
        for name in IndexName::ALL {
            let hits = index
                .read(name, &SearchQuery::term("id", "missing"))
                .await
                .expect("index exists");
            assert!(hits.is_empty());
        }
    }
}
