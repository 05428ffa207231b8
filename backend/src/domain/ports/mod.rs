//! Domain ports defining the edges of the hexagon.
//!
//! Driven ports (`SearchIndex`, `MediaStore`, `PaymentGateway`) describe the
//! external systems the services call. Each exposes a typed error so adapters
//! map their failures into predictable variants. Driving ports
//! (`AppCatalogue`, `UserAccounts`) are what inbound adapters call.

mod macros;
pub(crate) use macros::define_port_error;

mod app_catalogue;
mod media_store;
mod payment_gateway;
mod search_index;
mod user_accounts;

#[cfg(test)]
pub use app_catalogue::MockAppCatalogue;
pub use app_catalogue::AppCatalogue;
#[cfg(test)]
pub use media_store::MockMediaStore;
pub use media_store::{MediaLink, MediaStore, MediaStoreError, MediaUpload};
#[cfg(test)]
pub use payment_gateway::MockPaymentGateway;
pub use payment_gateway::{
    FIXTURE_CHECKOUT_BASE, FixturePaymentGateway, PaymentGateway, PaymentGatewayError,
    ProductPrice,
};
#[cfg(test)]
pub use search_index::MockSearchIndex;
pub use search_index::{SearchIndex, SearchIndexError};
#[cfg(test)]
pub use user_accounts::MockUserAccounts;
pub use user_accounts::UserAccounts;
