//! In-memory adapters used when no external backend is configured.

mod index;
mod media;

pub use index::InMemorySearchIndex;
pub use media::{InMemoryMediaStore, MEMORY_MEDIA_PREFIX};
