//! Reqwest-backed Google Cloud Storage media adapter.
//!
//! Uploads use the JSON API simple upload (`uploadType=media`). Each object
//! is then made publicly readable and its `mediaLink` returned.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url, header};
use tracing::info;
use zeroize::Zeroizing;

use super::dto::{ObjectDto, PUBLIC_READ};
use crate::domain::ports::{MediaLink, MediaStore, MediaStoreError, MediaUpload};
use crate::outbound::http_support::{build_client, map_transport_error, read_json, success_body};

/// Default Cloud Storage API endpoint.
pub const DEFAULT_GCS_ENDPOINT: &str = "https://storage.googleapis.com";

/// Cloud Storage adapter writing into one bucket.
pub struct GcsMediaStore {
    client: Client,
    endpoint: Url,
    bucket: String,
    token: Option<Zeroizing<String>>,
}

impl GcsMediaStore {
    /// Build an adapter using a reqwest client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        endpoint: Url,
        bucket: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_client(timeout)?,
            endpoint,
            bucket: bucket.into(),
            token: None,
        })
    }

    /// Send `token` as an OAuth bearer token on every request.
    #[must_use]
    pub fn with_bearer_token(mut self, token: &str) -> Self {
        self.token = Some(Zeroizing::new(token.to_owned()));
        self
    }

    fn upload_url(&self, key: &str) -> Result<Url, MediaStoreError> {
        let mut url = join(&self.endpoint, &["upload", "storage", "v1", "b", &self.bucket, "o"])?;
        url.query_pairs_mut()
            .append_pair("uploadType", "media")
            .append_pair("name", key);
        Ok(url)
    }

    fn acl_url(&self, object: &str) -> Result<Url, MediaStoreError> {
        join(
            &self.endpoint,
            &["storage", "v1", "b", &self.bucket, "o", object, "acl"],
        )
    }

    fn authorise(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token.as_str()),
            None => builder,
        }
    }
}

fn join(base: &Url, segments: &[&str]) -> Result<Url, MediaStoreError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| MediaStoreError::rejected(format!("{base} cannot carry a path")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

#[async_trait]
impl MediaStore for GcsMediaStore {
    async fn store(&self, key: &str, media: MediaUpload) -> Result<MediaLink, MediaStoreError> {
        let content_type = media.content_type_or_default().to_owned();
        let size = media.bytes.len();
        let response = self
            .authorise(self.client.post(self.upload_url(key)?))
            .header(header::CONTENT_TYPE, content_type)
            .body(media.bytes)
            .send()
            .await
            .map_err(|err| map_transport_error::<MediaStoreError>(&err))?;
        let object = read_json::<ObjectDto, MediaStoreError>(response).await?;

        let response = self
            .authorise(self.client.post(self.acl_url(&object.name)?))
            .json(&PUBLIC_READ)
            .send()
            .await
            .map_err(|err| map_transport_error::<MediaStoreError>(&err))?;
        success_body::<MediaStoreError>(response).await?;

        let link = object.media_link.ok_or_else(|| {
            MediaStoreError::decode(format!("object {} has no mediaLink", object.name))
        })?;
        info!(bucket = %self.bucket, object = %object.name, size, "media uploaded");
        Ok(MediaLink::new(link))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> GcsMediaStore {
        let endpoint = Url::parse(DEFAULT_GCS_ENDPOINT).expect("valid url");
        GcsMediaStore::new(endpoint, "app-media", Duration::from_secs(5)).expect("client builds")
    }

    #[test]
    fn upload_url_uses_simple_media_upload() {
        let url = store().upload_url("3fa85f64").expect("url builds");
        assert_eq!(
            url.as_str(),
            "https://storage.googleapis.com/upload/storage/v1/b/app-media/o?uploadType=media&name=3fa85f64"
        );
    }

    #[test]
    fn acl_url_escapes_object_name() {
        let url = store().acl_url("a/b").expect("url builds");
        assert_eq!(
            url.as_str(),
            "https://storage.googleapis.com/storage/v1/b/app-media/o/a%2Fb/acl"
        );
    }

    #[test]
    fn object_resource_decodes_media_link() {
        let object: ObjectDto = serde_json::from_str(
            r#"{"name":"a1","bucket":"app-media","mediaLink":"https://storage.googleapis.com/download/a1"}"#,
        )
        .expect("decodes");
        assert_eq!(
            object.media_link.as_deref(),
            Some("https://storage.googleapis.com/download/a1")
        );
    }

    #[test]
    fn public_read_acl_targets_all_users() {
        let value = serde_json::to_value(PUBLIC_READ).expect("serialises");
        assert_eq!(value, serde_json::json!({ "entity": "allUsers", "role": "READER" }));
    }
}
