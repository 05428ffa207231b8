//! Google Cloud Storage outbound adapter implementing the `MediaStore` port.

mod dto;
mod http_store;

pub use http_store::{DEFAULT_GCS_ENDPOINT, GcsMediaStore};
