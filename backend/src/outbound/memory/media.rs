//! In-process media store.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::ports::{MediaLink, MediaStore, MediaStoreError, MediaUpload};

/// Scheme and prefix of links handed out by [`InMemoryMediaStore`].
pub const MEMORY_MEDIA_PREFIX: &str = "memory://media/";

/// Media store keeping uploads in memory.
#[derive(Debug, Default)]
pub struct InMemoryMediaStore {
    objects: Mutex<HashMap<String, MediaUpload>>,
}

impl InMemoryMediaStore {
    /// Stored media for `key`, if any.
    pub fn get(&self, key: &str) -> Result<Option<MediaUpload>, MediaStoreError> {
        let objects = self
            .objects
            .lock()
            .map_err(|_| MediaStoreError::transport("in-memory media lock poisoned"))?;
        Ok(objects.get(key).cloned())
    }
}

#[async_trait]
impl MediaStore for InMemoryMediaStore {
    async fn store(&self, key: &str, media: MediaUpload) -> Result<MediaLink, MediaStoreError> {
        let mut objects = self
            .objects
            .lock()
            .map_err(|_| MediaStoreError::transport("in-memory media lock poisoned"))?;
        objects.insert(key.to_owned(), media);
        Ok(MediaLink::new(format!("{MEMORY_MEDIA_PREFIX}{key}")))
    }
}
