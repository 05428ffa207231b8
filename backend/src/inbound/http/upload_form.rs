//! Multipart parsing for `POST /upload`.
//!
//! Text parts are collected by name; the `media_file` part is buffered in
//! memory with its client-supplied file name and content type. Unknown parts
//! are drained and ignored. Every part is bounded by [`UploadLimits`].

use actix_multipart::{Field, Multipart, MultipartError};
use futures_util::TryStreamExt;
use serde_json::json;
use tracing::warn;

use crate::domain::ports::MediaUpload;
use crate::domain::{AppListing, Error};

/// Name of the binary part carrying the app media.
pub const MEDIA_FIELD: &str = "media_file";

/// Default cap on the `media_file` part.
pub const DEFAULT_MAX_MEDIA_BYTES: usize = 32 * 1024 * 1024;
/// Default cap on each text part and on each ignored part.
pub const DEFAULT_MAX_TEXT_BYTES: usize = 64 * 1024;

/// Per-part size caps applied while reading an upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadLimits {
    /// Largest accepted `media_file` part, in bytes.
    pub media_bytes: usize,
    /// Largest accepted text or ignored part, in bytes.
    pub text_bytes: usize,
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self {
            media_bytes: DEFAULT_MAX_MEDIA_BYTES,
            text_bytes: DEFAULT_MAX_TEXT_BYTES,
        }
    }
}

/// Raw upload form as received from the client.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct UploadForm {
    /// Owning user identifier.
    pub user: String,
    /// App title.
    pub title: String,
    /// App description.
    pub description: String,
    /// Price in whole currency units, unparsed.
    pub price: String,
    /// Media part, if one was sent.
    pub media: Option<MediaUpload>,
}

fn malformed(err: &MultipartError) -> Error {
    Error::invalid_request("malformed multipart body").with_details(json!({
        "reason": err.to_string(),
    }))
}

fn too_large(name: &str, limit: usize) -> Error {
    Error::invalid_request(format!("{name} exceeds {limit} bytes"))
        .with_details(json!({ "field": name, "limit": limit }))
}

/// Stream `field` through `sink`, failing once more than `limit` bytes arrive.
async fn consume(
    field: &mut Field,
    name: &str,
    limit: usize,
    mut sink: impl FnMut(&[u8]),
) -> Result<(), Error> {
    let mut seen = 0_usize;
    while let Some(chunk) = field.try_next().await.map_err(|err| malformed(&err))? {
        seen = seen.saturating_add(chunk.len());
        if seen > limit {
            return Err(too_large(name, limit));
        }
        sink(&chunk[..]);
    }
    Ok(())
}

async fn read_bytes(field: &mut Field, name: &str, limit: usize) -> Result<Vec<u8>, Error> {
    let mut bytes = Vec::new();
    consume(field, name, limit, |chunk| bytes.extend_from_slice(chunk)).await?;
    Ok(bytes)
}

async fn read_text(field: &mut Field, name: &str, limit: usize) -> Result<String, Error> {
    let bytes = read_bytes(field, name, limit).await?;
    String::from_utf8(bytes).map_err(|_| {
        Error::invalid_request(format!("{name} must be valid UTF-8"))
            .with_details(json!({ "field": name }))
    })
}

impl UploadForm {
    /// Drain `payload` into a form, rejecting parts larger than `limits`.
    pub async fn read(mut payload: Multipart, limits: UploadLimits) -> Result<Self, Error> {
        let mut form = Self::default();
        while let Some(mut field) = payload.try_next().await.map_err(|err| malformed(&err))? {
            let name = field.name().unwrap_or_default().to_owned();
            let text_limit = limits.text_bytes;
            match name.as_str() {
                "user" => form.user = read_text(&mut field, &name, text_limit).await?,
                "title" => form.title = read_text(&mut field, &name, text_limit).await?,
                "description" => {
                    form.description = read_text(&mut field, &name, text_limit).await?;
                }
                "price" => form.price = read_text(&mut field, &name, text_limit).await?,
                MEDIA_FIELD => {
                    let file_name = field
                        .content_disposition()
                        .and_then(|disposition| disposition.get_filename())
                        .map(str::to_owned);
                    let content_type = field.content_type().map(ToString::to_string);
                    let bytes = read_bytes(&mut field, &name, limits.media_bytes).await?;
                    form.media = Some(MediaUpload {
                        file_name,
                        content_type,
                        bytes,
                    });
                }
                _ => consume(&mut field, &name, text_limit, |_| {}).await?,
            }
        }
        Ok(form)
    }

    /// Price in whole units; unparsable input is logged and read as zero.
    #[must_use]
    pub fn price_units(&self) -> i64 {
        self.price.parse().unwrap_or_else(|err| {
            warn!(price = %self.price, error = %err, "price is not an integer; using 0");
            0
        })
    }

    /// Split the form into a listing with a fresh id and its media.
    pub fn into_listing(self) -> Result<(AppListing, MediaUpload), Error> {
        let price = self.price_units();
        let Some(media) = self.media else {
            return Err(Error::invalid_request("Media file is not available")
                .with_details(json!({ "field": MEDIA_FIELD })));
        };
        let listing = AppListing::new(self.user, self.title, self.description, price);
        Ok((listing, media))
    }
}
