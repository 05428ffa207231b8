//! Reqwest-backed Stripe payment gateway adapter.
//!
//! Products are created with an inline `default_price_data`, so one request
//! yields both the product and its price. Checkout sessions are one-off
//! payments for a single unit that redirect back to the caller's origin.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use tracing::info;
use zeroize::Zeroizing;

use super::dto::{CheckoutSessionDto, ProductDto};
use crate::domain::ports::{PaymentGateway, PaymentGatewayError, ProductPrice};
use crate::outbound::http_support::{build_client, map_transport_error, read_json};

/// Default Stripe API endpoint.
pub const DEFAULT_STRIPE_ENDPOINT: &str = "https://api.stripe.com";
/// Default price currency.
pub const DEFAULT_CURRENCY: &str = "usd";

/// Stripe adapter authenticated with a secret API key.
pub struct StripeGateway {
    client: Client,
    endpoint: Url,
    secret_key: Zeroizing<String>,
    currency: String,
}

impl StripeGateway {
    /// Build an adapter using a reqwest client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(endpoint: Url, secret_key: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_client(timeout)?,
            endpoint,
            secret_key: Zeroizing::new(secret_key.to_owned()),
            currency: DEFAULT_CURRENCY.to_owned(),
        })
    }

    /// Price new products in `currency` (ISO 4217, lowercase).
    #[must_use]
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    fn url(&self, segments: &[&str]) -> Result<Url, PaymentGatewayError> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|()| {
                PaymentGatewayError::rejected(format!("{} cannot carry a path", self.endpoint))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn post_form<T: serde::de::DeserializeOwned>(
        &self,
        segments: &[&str],
        form: &[(&str, String)],
    ) -> Result<T, PaymentGatewayError> {
        let response = self
            .client
            .post(self.url(segments)?)
            .bearer_auth(self.secret_key.as_str())
            .form(form)
            .send()
            .await
            .map_err(|err| map_transport_error::<PaymentGatewayError>(&err))?;
        read_json::<T, PaymentGatewayError>(response).await
    }
}

fn product_form(
    name: &str,
    description: &str,
    unit_amount: i64,
    currency: &str,
) -> Vec<(&'static str, String)> {
    let mut form = vec![
        ("name", name.to_owned()),
        ("default_price_data[currency]", currency.to_owned()),
        ("default_price_data[unit_amount]", unit_amount.to_string()),
    ];
    if !description.is_empty() {
        form.push(("description", description.to_owned()));
    }
    form
}

fn checkout_form(origin: &str, price_id: &str) -> Vec<(&'static str, String)> {
    vec![
        ("mode", "payment".to_owned()),
        ("line_items[0][price]", price_id.to_owned()),
        ("line_items[0][quantity]", "1".to_owned()),
        ("success_url", format!("{origin}?success=true")),
        ("cancel_url", format!("{origin}?canceled=true")),
    ]
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    async fn create_product_with_price(
        &self,
        name: &str,
        description: &str,
        unit_amount: i64,
    ) -> Result<ProductPrice, PaymentGatewayError> {
        let form = product_form(name, description, unit_amount, &self.currency);
        let product: ProductDto = self.post_form(&["v1", "products"], &form).await?;
        let price_id = product.default_price.ok_or_else(|| {
            PaymentGatewayError::decode(format!("product {} has no default price", product.id))
        })?;
        info!(product_id = %product.id, %price_id, "created product and price");
        Ok(ProductPrice {
            product_id: product.id,
            price_id,
        })
    }

    async fn create_checkout_session(
        &self,
        origin: &str,
        price_id: &str,
    ) -> Result<String, PaymentGatewayError> {
        let form = checkout_form(origin, price_id);
        let session: CheckoutSessionDto = self
            .post_form(&["v1", "checkout", "sessions"], &form)
            .await?;
        info!(session_id = %session.id, "created checkout session");
        session.url.ok_or_else(|| {
            PaymentGatewayError::decode(format!("checkout session {} has no url", session.id))
        })
    }
}
