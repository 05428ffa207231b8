//! Rendering of [`SearchQuery`] trees as Elasticsearch query DSL.

use serde_json::{Value, json};

use crate::domain::{IndexName, MatchOperator, MatchQuery, SearchQuery, ZeroTermsPolicy};

fn operator_name(operator: MatchOperator) -> &'static str {
    match operator {
        MatchOperator::And => "and",
        MatchOperator::Or => "or",
    }
}

fn zero_terms_name(policy: ZeroTermsPolicy) -> &'static str {
    match policy {
        ZeroTermsPolicy::None => "none",
        ZeroTermsPolicy::All => "all",
    }
}

/// Render `query` as the value of a search request's `query` key.
pub fn render(query: &SearchQuery) -> Value {
    match query {
        SearchQuery::Term { field, value } => json!({ "term": { field: value } }),
        SearchQuery::Match(MatchQuery {
            field,
            text,
            operator,
            zero_terms,
        }) => json!({
            "match": {
                field: {
                    "query": text,
                    "operator": operator_name(*operator),
                    "zero_terms_query": zero_terms_name(*zero_terms),
                }
            }
        }),
        SearchQuery::Bool { must } => json!({
            "bool": { "must": must.iter().map(render).collect::<Vec<_>>() }
        }),
    }
}

/// Field mapping used when creating `index`.
pub fn mapping(index: IndexName) -> Value {
    match index {
        IndexName::App => json!({
            "mappings": {
                "properties": {
                    "id": { "type": "keyword" },
                    "user": { "type": "keyword" },
                    "title": { "type": "text" },
                    "description": { "type": "text" },
                    "price": { "type": "long" },
                    "url": { "type": "keyword", "index": false },
                    "product_id": { "type": "keyword" },
                    "price_id": { "type": "keyword" }
                }
            }
        }),
        IndexName::User => json!({
            "mappings": {
                "properties": {
                    "username": { "type": "keyword" },
                    "password": { "type": "keyword" }
                }
            }
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn term_query_renders_field_and_value() {
        assert_eq!(
            render(&SearchQuery::term("id", "app-1")),
            json!({ "term": { "id": "app-1" } })
        );
    }

    #[test]
    fn match_query_carries_operator_and_zero_terms() {
        let query = SearchQuery::matching("title", "", MatchOperator::And, ZeroTermsPolicy::All);
        assert_eq!(
            render(&query),
            json!({
                "match": {
                    "title": { "query": "", "operator": "and", "zero_terms_query": "all" }
                }
            })
        );
    }

    #[test]
    fn bool_query_nests_clauses() {
        let query = SearchQuery::all_of(vec![
            SearchQuery::matching("title", "foo", MatchOperator::And, ZeroTermsPolicy::None),
            SearchQuery::matching("description", "bar", MatchOperator::Or, ZeroTermsPolicy::None),
        ]);
        let rendered = render(&query);
        let must = rendered["bool"]["must"].as_array().expect("must array");
        assert_eq!(must.len(), 2);
        assert_eq!(must[1]["match"]["description"]["operator"], "or");
    }

    #[test]
    fn app_mapping_keeps_url_out_of_the_index() {
        let mapping = mapping(IndexName::App);
        assert_eq!(mapping["mappings"]["properties"]["url"]["index"], false);
        assert_eq!(mapping["mappings"]["properties"]["title"]["type"], "text");
        assert_eq!(mapping["mappings"]["properties"]["id"]["type"], "keyword");
    }
}
