//! Search index vocabulary: index names, typed queries, and typed documents.
//!
//! Results are decoded per index: reading the app index yields
//! [`IndexedDocument::App`] values and the user index yields
//! [`IndexedDocument::User`] values.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use super::{App, User};

/// Indices known to the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IndexName {
    /// Published apps keyed by app id.
    App,
    /// Registered users keyed by username.
    User,
}

impl IndexName {
    /// Every index the service writes to.
    pub const ALL: [Self; 2] = [Self::App, Self::User];

    /// Index name as used by the search backend.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::App => "app",
            Self::User => "user",
        }
    }
}

impl fmt::Display for IndexName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the terms of a text match combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOperator {
    /// Every term must match.
    And,
    /// Any term may match.
    Or,
}

/// Behaviour of a text match whose search text has no terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZeroTermsPolicy {
    /// Match nothing.
    None,
    /// Match every document.
    All,
}

/// Full-text match against one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchQuery {
    /// Field to analyse.
    pub field: String,
    /// Search text.
    pub text: String,
    /// Term combination.
    pub operator: MatchOperator,
    /// Behaviour when `text` has no terms.
    pub zero_terms: ZeroTermsPolicy,
}

/// Query tree understood by every search index adapter.
///
/// # Examples
/// ```
/// use appstore::domain::{MatchOperator, SearchQuery, ZeroTermsPolicy};
///
/// let query = SearchQuery::all_of(vec![
///     SearchQuery::matching("title", "foo", MatchOperator::And, ZeroTermsPolicy::None),
///     SearchQuery::term("user", "alice"),
/// ]);
/// assert!(matches!(query, SearchQuery::Bool { .. }));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchQuery {
    /// Exact equality on a field value.
    Term {
        /// Field to compare.
        field: String,
        /// Expected value.
        value: String,
    },
    /// Full-text match.
    Match(MatchQuery),
    /// Conjunction: every clause must match.
    Bool {
        /// Required clauses.
        must: Vec<SearchQuery>,
    },
}

impl SearchQuery {
    /// Exact-equality query.
    pub fn term(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Term {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Full-text match query.
    pub fn matching(
        field: impl Into<String>,
        text: impl Into<String>,
        operator: MatchOperator,
        zero_terms: ZeroTermsPolicy,
    ) -> Self {
        Self::Match(MatchQuery {
            field: field.into(),
            text: text.into(),
            operator,
            zero_terms,
        })
    }

    /// Conjunction of `clauses`.
    #[must_use]
    pub fn all_of(clauses: Vec<Self>) -> Self {
        Self::Bool { must: clauses }
    }
}

/// Document stored in one of the indices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum IndexedDocument {
    /// Document from the app index.
    App(App),
    /// Document from the user index.
    User(User),
}

impl IndexedDocument {
    /// Index this document belongs to.
    #[must_use]
    pub fn index(&self) -> IndexName {
        match self {
            Self::App(_) => IndexName::App,
            Self::User(_) => IndexName::User,
        }
    }

    /// Decode a raw document source using the schema of `index`.
    pub fn decode(index: IndexName, source: Value) -> Result<Self, serde_json::Error> {
        match index {
            IndexName::App => serde_json::from_value(source).map(Self::App),
            IndexName::User => serde_json::from_value(source).map(Self::User),
        }
    }
}

/// Result set of one read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchHits {
    total: u64,
    documents: Vec<IndexedDocument>,
}

impl SearchHits {
    /// Build a result set from the backend's total hit count and decoded documents.
    #[must_use]
    pub fn new(total: u64, documents: Vec<IndexedDocument>) -> Self {
        Self { total, documents }
    }

    /// Total number of matching documents reported by the backend.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Whether the backend reported any match.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Returned app documents.
    #[must_use]
    pub fn into_apps(self) -> Vec<App> {
        self.documents
            .into_iter()
            .filter_map(|document| match document {
                IndexedDocument::App(app) => Some(app),
                IndexedDocument::User(_) => None,
            })
            .collect()
    }

    /// Returned user documents.
    #[must_use]
    pub fn into_users(self) -> Vec<User> {
        self.documents
            .into_iter()
            .filter_map(|document| match document {
                IndexedDocument::User(user) => Some(user),
                IndexedDocument::App(_) => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decode_selects_schema_by_index() {
        let app_source = json!({
            "id": "a1",
            "user": "alice",
            "title": "Foo",
            "description": "Bar",
            "price": 10,
            "url": "memory://media/a1",
            "product_id": "prod_1",
            "price_id": "price_1"
        });
        let decoded = IndexedDocument::decode(IndexName::App, app_source).expect("app decodes");
        assert_eq!(decoded.index(), IndexName::App);

        let user_source = json!({ "username": "alice", "password": "$argon2id$..." });
        let decoded = IndexedDocument::decode(IndexName::User, user_source).expect("user decodes");
        assert_eq!(decoded.index(), IndexName::User);
    }

    #[test]
    fn decode_rejects_documents_from_the_wrong_index() {
        let user_source = json!({ "username": "alice", "password": "x" });
        assert!(IndexedDocument::decode(IndexName::App, user_source).is_err());
    }

    #[test]
    fn hits_split_by_document_kind() {
        let user = serde_json::from_value::<User>(json!({ "username": "bob", "password": "x" }))
            .expect("user decodes");
        let hits = SearchHits::new(1, vec![IndexedDocument::User(user)]);
        assert!(!hits.is_empty());
        assert!(hits.clone().into_apps().is_empty());
        assert_eq!(hits.into_users().len(), 1);
    }
}
