//! In-process search index.
//!
//! Documents are kept as JSON per index and queries are evaluated directly
//! against them. Text matching lowercases and splits on non-alphanumeric
//! characters, which approximates the standard analyser closely enough for
//! local runs and tests.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::ports::{SearchIndex, SearchIndexError};
use crate::domain::{
    IndexName, IndexedDocument, MatchOperator, MatchQuery, SearchHits, SearchQuery,
    ZeroTermsPolicy,
};

type Documents = BTreeMap<String, Value>;

/// Search index held in memory.
#[derive(Debug, Default)]
pub struct InMemorySearchIndex {
    indices: RwLock<HashMap<IndexName, Documents>>,
}

impl InMemorySearchIndex {
    /// Number of documents stored in `index`.
    pub fn document_count(&self, index: IndexName) -> Result<usize, SearchIndexError> {
        let indices = self.indices.read().map_err(|_| poisoned())?;
        Ok(indices.get(&index).map_or(0, BTreeMap::len))
    }
}

fn poisoned() -> SearchIndexError {
    SearchIndexError::transport("in-memory index lock poisoned")
}

fn tokens(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
        .collect()
}

fn field_text(document: &Value, field: &str) -> Option<String> {
    match document.get(field)? {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

fn matches_text(document: &Value, query: &MatchQuery) -> bool {
    let wanted = tokens(&query.text);
    if wanted.is_empty() {
        return query.zero_terms == ZeroTermsPolicy::All;
    }
    let Some(text) = field_text(document, &query.field) else {
        return false;
    };
    let present = tokens(&text);
    match query.operator {
        MatchOperator::And => wanted.iter().all(|token| present.contains(token)),
        MatchOperator::Or => wanted.iter().any(|token| present.contains(token)),
    }
}

fn matches(document: &Value, query: &SearchQuery) -> bool {
    match query {
        SearchQuery::Term { field, value } => {
            field_text(document, field).is_some_and(|text| text == *value)
        }
        SearchQuery::Match(query) => matches_text(document, query),
        SearchQuery::Bool { must } => must.iter().all(|clause| matches(document, clause)),
    }
}

#[async_trait]
impl SearchIndex for InMemorySearchIndex {
    async fn ensure_index(&self, index: IndexName) -> Result<(), SearchIndexError> {
        let mut indices = self.indices.write().map_err(|_| poisoned())?;
        indices.entry(index).or_default();
        Ok(())
    }

    async fn write(
        &self,
        index: IndexName,
        key: &str,
        document: &IndexedDocument,
    ) -> Result<(), SearchIndexError> {
        let value = serde_json::to_value(document)
            .map_err(|err| SearchIndexError::decode(err.to_string()))?;
        let mut indices = self.indices.write().map_err(|_| poisoned())?;
        indices.entry(index).or_default().insert(key.to_owned(), value);
        Ok(())
    }

    async fn create(
        &self,
        index: IndexName,
        key: &str,
        document: &IndexedDocument,
    ) -> Result<bool, SearchIndexError> {
        let value = serde_json::to_value(document)
            .map_err(|err| SearchIndexError::decode(err.to_string()))?;
        let mut indices = self.indices.write().map_err(|_| poisoned())?;
        match indices.entry(index).or_default().entry(key.to_owned()) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                slot.insert(value);
                Ok(true)
            }
        }
    }

    async fn read(
        &self,
        index: IndexName,
        query: &SearchQuery,
    ) -> Result<SearchHits, SearchIndexError> {
        let indices = self.indices.read().map_err(|_| poisoned())?;
        let documents = indices
            .get(&index)
            .into_iter()
            .flat_map(BTreeMap::values)
            .filter(|document| matches(document, query))
            .map(|document| {
                IndexedDocument::decode(index, document.clone())
                    .map_err(|err| SearchIndexError::decode(err.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let total = u64::try_from(documents.len()).unwrap_or(u64::MAX);
        Ok(SearchHits::new(total, documents))
    }
}
