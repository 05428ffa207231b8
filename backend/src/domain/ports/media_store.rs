//! Driven port for persisting uploaded media.

use std::fmt;

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors raised by media store adapters.
    pub enum MediaStoreError {
        /// The object store could not be reached.
        Transport => "media store unreachable: {message}",
        /// The object store did not answer in time.
        Timeout => "media store timed out: {message}",
        /// The object store refused the upload.
        Rejected => "media store rejected the upload: {message}",
        /// The object store answered with an unreadable payload.
        Decode => "media store returned an unreadable response: {message}",
    }
}

/// Binary media received with an upload.
#[derive(Clone, PartialEq, Eq)]
pub struct MediaUpload {
    /// File name supplied by the client, if any.
    pub file_name: Option<String>,
    /// MIME type supplied by the client, if any.
    pub content_type: Option<String>,
    /// File contents.
    pub bytes: Vec<u8>,
}

impl MediaUpload {
    /// Media with no client-supplied metadata.
    #[must_use]
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self {
            file_name: None,
            content_type: None,
            bytes,
        }
    }

    /// MIME type to send to the object store.
    #[must_use]
    pub fn content_type_or_default(&self) -> &str {
        self.content_type
            .as_deref()
            .unwrap_or("application/octet-stream")
    }
}

impl fmt::Debug for MediaUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaUpload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Publicly retrievable link to stored media.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaLink(String);

impl MediaLink {
    /// Wrap a link returned by the object store.
    pub fn new(link: impl Into<String>) -> Self {
        Self(link.into())
    }

    /// Borrow the link text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<MediaLink> for String {
    fn from(value: MediaLink) -> Self {
        value.0
    }
}

/// Port for storing media objects.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Store `media` under `key` and return a link clients can fetch it from.
    async fn store(&self, key: &str, media: MediaUpload) -> Result<MediaLink, MediaStoreError>;
}
