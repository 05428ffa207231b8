//! Elasticsearch outbound adapter implementing the `SearchIndex` port.

mod dto;
mod http_index;
mod query_dsl;

pub use http_index::{DEFAULT_MAX_HITS, ElasticsearchIndex};
