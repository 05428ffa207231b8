//! Driven port for the document index holding apps and users.

use async_trait::async_trait;

use crate::domain::{IndexName, IndexedDocument, SearchHits, SearchQuery};

use super::define_port_error;

define_port_error! {
    /// Errors raised by search index adapters.
    pub enum SearchIndexError {
        /// The index backend could not be reached.
        Transport => "search index unreachable: {message}",
        /// The index backend did not answer in time.
        Timeout => "search index timed out: {message}",
        /// The index backend refused the request.
        Rejected => "search index rejected the request: {message}",
        /// A response or stored document could not be decoded.
        Decode => "search index returned an unreadable document: {message}",
    }
}

/// Port for writing and querying indexed documents.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SearchIndex: Send + Sync {
    /// Create `index` with its field mapping when it does not exist yet.
    async fn ensure_index(&self, index: IndexName) -> Result<(), SearchIndexError>;

    /// Store `document` under `key`, replacing any previous document.
    async fn write(
        &self,
        index: IndexName,
        key: &str,
        document: &IndexedDocument,
    ) -> Result<(), SearchIndexError>;

    /// Store `document` under `key` only when no document has that key.
    ///
    /// Returns `Ok(false)` without touching the stored document when the key
    /// is already taken.
    async fn create(
        &self,
        index: IndexName,
        key: &str,
        document: &IndexedDocument,
    ) -> Result<bool, SearchIndexError>;

    /// Run `query` against `index`.
    async fn read(
        &self,
        index: IndexName,
        query: &SearchQuery,
    ) -> Result<SearchHits, SearchIndexError>;
}
