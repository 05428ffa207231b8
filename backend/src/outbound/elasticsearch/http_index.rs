//! Reqwest-backed Elasticsearch index adapter.
//!
//! Talks to the REST API directly: `HEAD`/`PUT /{index}` to create indices,
//! `PUT /{index}/_doc/{key}` to write, `PUT /{index}/_create/{key}` to insert
//! without overwriting, and `POST /{index}/_search` to read.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use serde_json::json;
use tracing::{debug, info};
use zeroize::Zeroizing;

use super::dto::{ErrorResponseDto, HitDto, SearchResponseDto};
use super::query_dsl::{mapping, render};
use crate::domain::ports::{SearchIndex, SearchIndexError};
use crate::domain::{IndexName, IndexedDocument, SearchHits, SearchQuery};
use crate::outbound::http_support::{
    build_client, map_status_error, map_transport_error, read_json, success_body,
};

/// Maximum number of documents returned by one read.
pub const DEFAULT_MAX_HITS: u32 = 100;

const ALREADY_EXISTS: &str = "resource_already_exists_exception";

struct BasicAuth {
    username: String,
    password: Zeroizing<String>,
}

/// Elasticsearch adapter bound to one cluster endpoint.
pub struct ElasticsearchIndex {
    client: Client,
    base: Url,
    auth: Option<BasicAuth>,
    max_hits: u32,
}

impl ElasticsearchIndex {
    /// Build an adapter using a reqwest client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_client(timeout)?,
            base,
            auth: None,
            max_hits: DEFAULT_MAX_HITS,
        })
    }

    /// Authenticate every request with HTTP basic credentials.
    #[must_use]
    pub fn with_basic_auth(mut self, username: impl Into<String>, password: &str) -> Self {
        self.auth = Some(BasicAuth {
            username: username.into(),
            password: Zeroizing::new(password.to_owned()),
        });
        self
    }

    /// Cap the number of documents returned by one read.
    #[must_use]
    pub fn with_max_hits(mut self, max_hits: u32) -> Self {
        self.max_hits = max_hits;
        self
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, SearchIndexError> {
        endpoint(&self.base, segments)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.client.request(method, url);
        match &self.auth {
            Some(auth) => builder.basic_auth(&auth.username, Some(auth.password.as_str())),
            None => builder,
        }
    }
}

fn endpoint(base: &Url, segments: &[&str]) -> Result<Url, SearchIndexError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| SearchIndexError::rejected(format!("{base} cannot carry a path")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

fn already_exists(body: &[u8]) -> bool {
    serde_json::from_slice::<ErrorResponseDto>(body)
        .is_ok_and(|response| response.error.kind == ALREADY_EXISTS)
}

/// Outcome of a `_create` request: 409 means the key is taken.
fn create_outcome(status: StatusCode, body: &[u8]) -> Result<bool, SearchIndexError> {
    if status.is_success() {
        Ok(true)
    } else if status == StatusCode::CONFLICT {
        Ok(false)
    } else {
        Err(map_status_error(status, body))
    }
}

fn decode_hits(
    index: IndexName,
    total: Option<u64>,
    hits: Vec<HitDto>,
) -> Result<SearchHits, SearchIndexError> {
    let total = total.unwrap_or_else(|| u64::try_from(hits.len()).unwrap_or(u64::MAX));
    let documents = hits
        .into_iter()
        .map(|hit| {
            let source = hit.source.ok_or_else(|| {
                SearchIndexError::decode(format!("hit {} in {index} has no _source", hit.id))
            })?;
            IndexedDocument::decode(index, source).map_err(|err| {
                SearchIndexError::decode(format!("hit {} in {index}: {err}", hit.id))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(SearchHits::new(total, documents))
}

#[async_trait]
impl SearchIndex for ElasticsearchIndex {
    async fn ensure_index(&self, index: IndexName) -> Result<(), SearchIndexError> {
        let url = self.endpoint(&[index.as_str()])?;
        let response = self
            .request(Method::HEAD, url.clone())
            .send()
            .await
            .map_err(|err| map_transport_error::<SearchIndexError>(&err))?;
        match response.status() {
            status if status.is_success() => {
                debug!(%index, "index already exists");
                return Ok(());
            }
            StatusCode::NOT_FOUND => {}
            status => return Err(map_status_error(status, &[])),
        }

        let response = self
            .request(Method::PUT, url)
            .json(&mapping(index))
            .send()
            .await
            .map_err(|err| map_transport_error::<SearchIndexError>(&err))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|err| map_transport_error::<SearchIndexError>(&err))?;
        if status.is_success() {
            info!(%index, "created index");
            Ok(())
        } else if already_exists(&body) {
            debug!(%index, "index created concurrently");
            Ok(())
        } else {
            Err(map_status_error(status, &body))
        }
    }

    async fn write(
        &self,
        index: IndexName,
        key: &str,
        document: &IndexedDocument,
    ) -> Result<(), SearchIndexError> {
        let mut url = self.endpoint(&[index.as_str(), "_doc", key])?;
        url.query_pairs_mut().append_pair("refresh", "wait_for");
        let response = self
            .request(Method::PUT, url)
            .json(document)
            .send()
            .await
            .map_err(|err| map_transport_error::<SearchIndexError>(&err))?;
        success_body::<SearchIndexError>(response).await?;
        debug!(%index, key, "document written");
        Ok(())
    }

    async fn create(
        &self,
        index: IndexName,
        key: &str,
        document: &IndexedDocument,
    ) -> Result<bool, SearchIndexError> {
        let mut url = self.endpoint(&[index.as_str(), "_create", key])?;
        url.query_pairs_mut().append_pair("refresh", "wait_for");
        let response = self
            .request(Method::PUT, url)
            .json(document)
            .send()
            .await
            .map_err(|err| map_transport_error::<SearchIndexError>(&err))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|err| map_transport_error::<SearchIndexError>(&err))?;
        let created = create_outcome(status, &body)?;
        debug!(%index, key, created, "document create attempted");
        Ok(created)
    }

    async fn read(
        &self,
        index: IndexName,
        query: &SearchQuery,
    ) -> Result<SearchHits, SearchIndexError> {
        let url = self.endpoint(&[index.as_str(), "_search"])?;
        let body = json!({ "query": render(query), "size": self.max_hits });
        let response = self
            .request(Method::POST, url)
            .json(&body)
            .send()
            .await
            .map_err(|err| map_transport_error::<SearchIndexError>(&err))?;
        let decoded = read_json::<SearchResponseDto, SearchIndexError>(response).await?;
        let total = decoded.hits.total.as_ref().map(|total| total.value());
        decode_hits(index, total, decoded.hits.hits)
    }
}
