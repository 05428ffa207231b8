//! Stripe outbound adapter implementing the `PaymentGateway` port.

mod dto;
mod http_gateway;

pub use http_gateway::{DEFAULT_CURRENCY, DEFAULT_STRIPE_ENDPOINT, StripeGateway};
