//! Driven port for the payment provider.

use async_trait::async_trait;
use uuid::Uuid;

use super::define_port_error;

define_port_error! {
    /// Errors raised by payment gateway adapters.
    pub enum PaymentGatewayError {
        /// The payment provider could not be reached.
        Transport => "payment provider unreachable: {message}",
        /// The payment provider did not answer in time.
        Timeout => "payment provider timed out: {message}",
        /// The payment provider refused the request.
        Rejected => "payment provider rejected the request: {message}",
        /// The payment provider answered with an unreadable payload.
        Decode => "payment provider returned an unreadable response: {message}",
    }
}

/// Product and price identifiers created for a sellable app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductPrice {
    /// Provider product identifier.
    pub product_id: String,
    /// Provider price identifier.
    pub price_id: String,
}

/// Port for creating products and hosted checkout sessions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a product with a default one-off price of `unit_amount` minor units.
    async fn create_product_with_price(
        &self,
        name: &str,
        description: &str,
        unit_amount: i64,
    ) -> Result<ProductPrice, PaymentGatewayError>;

    /// Create a hosted checkout session for one unit of `price_id`.
    ///
    /// `origin` is the caller's site; the session redirects back to it.
    async fn create_checkout_session(
        &self,
        origin: &str,
        price_id: &str,
    ) -> Result<String, PaymentGatewayError>;
}

/// Base URL of the sessions handed out by [`FixturePaymentGateway`].
pub const FIXTURE_CHECKOUT_BASE: &str = "https://checkout.fixture.invalid/pay";

/// Offline gateway used when no payment provider is configured.
///
/// Products, prices, and sessions get random identifiers; nothing is charged.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePaymentGateway;

#[async_trait]
impl PaymentGateway for FixturePaymentGateway {
    async fn create_product_with_price(
        &self,
        _name: &str,
        _description: &str,
        _unit_amount: i64,
    ) -> Result<ProductPrice, PaymentGatewayError> {
        Ok(ProductPrice {
            product_id: format!("prod_{}", Uuid::new_v4().simple()),
            price_id: format!("price_{}", Uuid::new_v4().simple()),
        })
    }

    async fn create_checkout_session(
        &self,
        _origin: &str,
        price_id: &str,
    ) -> Result<String, PaymentGatewayError> {
        Ok(format!(
            "{FIXTURE_CHECKOUT_BASE}/cs_{}?price={price_id}",
            Uuid::new_v4().simple()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixture_gateway_hands_out_distinct_identifiers() {
        let gateway = FixturePaymentGateway;
        let first = gateway
            .create_product_with_price("Foo", "Bar", 1_000)
            .await
            .expect("fixture product");
        let second = gateway
            .create_product_with_price("Foo", "Bar", 1_000)
            .await
            .expect("fixture product");

        assert!(first.product_id.starts_with("prod_"));
        assert!(first.price_id.starts_with("price_"));
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn fixture_sessions_reference_the_price() {
        let url = FixturePaymentGateway
            .create_checkout_session("https://shop.example", "price_123")
            .await
            .expect("fixture session");
        assert!(url.starts_with(FIXTURE_CHECKOUT_BASE));
        assert!(url.ends_with("price=price_123"));
    }
}
