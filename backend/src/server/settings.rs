//! Application settings loaded via OrthoConfig.
//!
//! Values come from CLI flags, `APPSTORE_*` environment variables, and
//! configuration files. Leaving a backend's settings unset selects its
//! in-memory or fixture adapter.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use appstore::inbound::http::upload_form::DEFAULT_MAX_MEDIA_BYTES;
use appstore::outbound::elasticsearch::DEFAULT_MAX_HITS;
use appstore::outbound::gcs::DEFAULT_GCS_ENDPOINT;
use appstore::outbound::stripe::{DEFAULT_CURRENCY, DEFAULT_STRIPE_ENDPOINT};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Settings controlling the listener and the external backends.
#[derive(Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "APPSTORE")]
pub struct AppSettings {
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<String>,
    /// Timeout applied to every outbound request, in seconds.
    pub request_timeout_secs: Option<u64>,
    /// Largest accepted upload media part, in bytes.
    pub max_media_bytes: Option<usize>,
    /// Elasticsearch base URL; unset selects the in-memory index.
    pub elasticsearch_url: Option<String>,
    /// Elasticsearch basic-auth username.
    pub elasticsearch_username: Option<String>,
    /// Elasticsearch basic-auth password.
    pub elasticsearch_password: Option<String>,
    /// Maximum documents returned by one search.
    pub elasticsearch_max_hits: Option<u32>,
    /// Cloud Storage bucket; unset selects the in-memory media store.
    pub gcs_bucket: Option<String>,
    /// OAuth bearer token for Cloud Storage.
    pub gcs_token: Option<String>,
    /// Cloud Storage API endpoint override.
    pub gcs_endpoint: Option<String>,
    /// Stripe secret key; unset selects the fixture payment gateway.
    pub stripe_secret_key: Option<String>,
    /// Stripe API endpoint override.
    pub stripe_endpoint: Option<String>,
    /// Currency for new prices.
    pub stripe_currency: Option<String>,
}

impl AppSettings {
    /// Return the bind address, falling back to the default.
    pub fn bind_addr(&self) -> &str {
        self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR)
    }

    /// Return the outbound request timeout, falling back to the default.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.request_timeout_secs
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        )
    }

    /// Return the upload media cap, falling back to the default.
    pub fn max_media_bytes(&self) -> usize {
        self.max_media_bytes.unwrap_or(DEFAULT_MAX_MEDIA_BYTES)
    }

    /// Return the search result cap, falling back to the default.
    pub fn elasticsearch_max_hits(&self) -> u32 {
        self.elasticsearch_max_hits.unwrap_or(DEFAULT_MAX_HITS)
    }

    /// Return the Cloud Storage endpoint, falling back to the public API.
    pub fn gcs_endpoint(&self) -> &str {
        self.gcs_endpoint.as_deref().unwrap_or(DEFAULT_GCS_ENDPOINT)
    }

    /// Return the Stripe endpoint, falling back to the public API.
    pub fn stripe_endpoint(&self) -> &str {
        self.stripe_endpoint
            .as_deref()
            .unwrap_or(DEFAULT_STRIPE_ENDPOINT)
    }

    /// Return the price currency, falling back to the default.
    pub fn stripe_currency(&self) -> &str {
        self.stripe_currency.as_deref().unwrap_or(DEFAULT_CURRENCY)
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for settings parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const KEYS: [&str; 13] = [
        "APPSTORE_BIND_ADDR",
        "APPSTORE_REQUEST_TIMEOUT_SECS",
        "APPSTORE_MAX_MEDIA_BYTES",
        "APPSTORE_ELASTICSEARCH_URL",
        "APPSTORE_ELASTICSEARCH_USERNAME",
        "APPSTORE_ELASTICSEARCH_PASSWORD",
        "APPSTORE_ELASTICSEARCH_MAX_HITS",
        "APPSTORE_GCS_BUCKET",
        "APPSTORE_GCS_TOKEN",
        "APPSTORE_GCS_ENDPOINT",
        "APPSTORE_STRIPE_SECRET_KEY",
        "APPSTORE_STRIPE_ENDPOINT",
        "APPSTORE_STRIPE_CURRENCY",
    ];

    fn load_from_empty_args() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("appstore")]).expect("config should load")
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env(KEYS.map(|key| (key, None::<String>)));

        let settings = load_from_empty_args();
        assert_eq!(settings.bind_addr(), DEFAULT_BIND_ADDR);
        assert_eq!(
            settings.request_timeout(),
            Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS)
        );
        assert_eq!(settings.max_media_bytes(), DEFAULT_MAX_MEDIA_BYTES);
        assert_eq!(settings.elasticsearch_max_hits(), DEFAULT_MAX_HITS);
        assert_eq!(settings.gcs_endpoint(), DEFAULT_GCS_ENDPOINT);
        assert_eq!(settings.stripe_endpoint(), DEFAULT_STRIPE_ENDPOINT);
        assert_eq!(settings.stripe_currency(), "usd");
        assert!(settings.elasticsearch_url.is_none());
        assert!(settings.gcs_bucket.is_none());
        assert!(settings.stripe_secret_key.is_none());
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("APPSTORE_BIND_ADDR", Some("127.0.0.1:9000".to_owned())),
            ("APPSTORE_REQUEST_TIMEOUT_SECS", Some("5".to_owned())),
            ("APPSTORE_MAX_MEDIA_BYTES", Some("1048576".to_owned())),
            (
                "APPSTORE_ELASTICSEARCH_URL",
                Some("http://localhost:9200".to_owned()),
            ),
            ("APPSTORE_GCS_BUCKET", Some("app-media".to_owned())),
            ("APPSTORE_STRIPE_CURRENCY", Some("eur".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(settings.bind_addr(), "127.0.0.1:9000");
        assert_eq!(settings.request_timeout(), Duration::from_secs(5));
        assert_eq!(settings.max_media_bytes(), 1_048_576);
        assert_eq!(
            settings.elasticsearch_url.as_deref(),
            Some("http://localhost:9200")
        );
        assert_eq!(settings.gcs_bucket.as_deref(), Some("app-media"));
        assert_eq!(settings.stripe_currency(), "eur");
    }
}
