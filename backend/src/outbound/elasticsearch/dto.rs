//! Wire types for Elasticsearch responses.

use serde::Deserialize;
use serde_json::Value;

/// `_search` response body.
#[derive(Debug, Deserialize)]
pub struct SearchResponseDto {
    pub hits: HitsDto,
}

/// `hits` object of a search response.
#[derive(Debug, Deserialize)]
pub struct HitsDto {
    #[serde(default)]
    pub total: Option<TotalHitsDto>,
    #[serde(default)]
    pub hits: Vec<HitDto>,
}

/// Total hit count; 7.x returns an object, 6.x a bare number.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum TotalHitsDto {
    Count(u64),
    Object { value: u64 },
}

impl TotalHitsDto {
    pub fn value(&self) -> u64 {
        match self {
            Self::Count(value) | Self::Object { value } => *value,
        }
    }
}

/// One search hit.
#[derive(Debug, Deserialize)]
pub struct HitDto {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_source")]
    pub source: Option<Value>,
}

/// Error body returned by Elasticsearch on failed requests.
#[derive(Debug, Deserialize)]
pub struct ErrorResponseDto {
    pub error: ErrorCauseDto,
}

/// Root cause of a failed request.
#[derive(Debug, Deserialize)]
pub struct ErrorCauseDto {
    #[serde(rename = "type")]
    pub kind: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(json!({ "value": 3, "relation": "eq" }))]
    #[case(json!(3))]
    fn total_hits_accepts_both_shapes(#[case] total: Value) {
        let body = json!({ "hits": { "total": total, "hits": [] } });
        let dto: SearchResponseDto = serde_json::from_value(body).expect("decodes");
        assert_eq!(dto.hits.total.map(|total| total.value()), Some(3));
    }
}
