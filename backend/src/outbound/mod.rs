//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **elasticsearch**: `SearchIndex` over the Elasticsearch REST API
//! - **gcs**: `MediaStore` over the Cloud Storage JSON API
//! - **stripe**: `PaymentGateway` over the Stripe REST API
//! - **memory**: in-process `SearchIndex` and `MediaStore` for local runs
//!
//! Adapters are thin translators that convert between domain types and
//! wire representations. They contain no business logic.

pub mod elasticsearch;
pub mod gcs;
mod http_support;
pub mod memory;
pub mod stripe;
