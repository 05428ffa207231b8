//! Wire types for the Stripe REST API.

use serde::Deserialize;

/// `POST /v1/products` response.
#[derive(Debug, Deserialize)]
pub struct ProductDto {
    pub id: String,
    pub default_price: Option<String>,
}

/// `POST /v1/checkout/sessions` response.
#[derive(Debug, Deserialize)]
pub struct CheckoutSessionDto {
    pub id: String,
    pub url: Option<String>,
}
