//! Web search.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use switchboard_core::{
    envelope::{ProviderResult, RawResponse},
    error::SwitchboardError,
};

use crate::{
    client::{ApiClient, Expect},
    names::GOOGLE_SEARCH,
    normalize::{normalize, unexpected, ResponseParser},
};

/// One search result. Missing or `null` fields read as empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub snippet: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub link: String,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Expects `{"results": [...]}` or a bare array of hits.
pub struct SearchParser<'a> {
    pub query: &'a str,
}

impl ResponseParser for SearchParser<'_> {
    fn action(&self) -> &str {
        "Search"
    }

    fn parse(&self, raw: RawResponse) -> Result<ProviderResult, SwitchboardError> {
        let items = match raw {
            RawResponse::Json(Value::Object(mut map)) => match map.remove("results") {
                Some(Value::Array(items)) => items,
                _ => return Err(unexpected("search response has no results array")),
            },
            RawResponse::Json(Value::Array(items)) => items,
            _ => return Err(unexpected("search response is not JSON")),
        };
        // One malformed hit must not sink the others.
        let hits: Vec<SearchHit> = items
            .into_iter()
            .filter(Value::is_object)
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect();
        let summary = format!(
            "Found {} search results for \"{}\"",
            hits.len(),
            self.query
        );
        Ok(ProviderResult::ok(summary, Some(serde_json::to_value(hits)?)))
    }
}

/// Search the web for `query`, asking for `num` results.
pub async fn search(client: &ApiClient, query: &str, num: usize) -> ProviderResult {
    let num = num.to_string();
    let outcome = client
        .call(
            GOOGLE_SEARCH,
            "",
            &[("q", query), ("num", num.as_str())],
            Expect::Auto,
        )
        .await;
    normalize(GOOGLE_SEARCH, outcome, &SearchParser { query })
}

/// Hits carried by a successful search result.
pub fn hits(result: &ProviderResult) -> Vec<SearchHit> {
    result
        .data
        .clone()
        .and_then(|v| serde_json::from_value(v).ok())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{client_with, MockTransport};
    use serde_json::json;

    #[test]
    fn test_parse_results_object() {
        let raw = RawResponse::Json(json!({
            "results": [
                {"title": "Rust", "snippet": "A language", "link": "https://rust-lang.org"},
                {"title": "Tokio", "snippet": "Async runtime", "link": "https://tokio.rs"}
            ]
        }));
        let result = SearchParser { query: "rust" }.parse(raw).unwrap();
        assert!(result.success);
        assert_eq!(result.summary, "Found 2 search results for \"rust\"");
        let hits = hits(&result);
        assert_eq!(hits[1].link, "https://tokio.rs");
    }

    #[test]
    fn test_parse_bare_array_with_missing_fields() {
        let raw = RawResponse::Json(json!([{"title": "Only a title"}]));
        let result = SearchParser { query: "x" }.parse(raw).unwrap();
        assert_eq!(hits(&result)[0].snippet, "");
    }

    #[test]
    fn test_parse_null_fields_keep_every_hit() {
        let raw = RawResponse::Json(json!({
            "results": [
                {"title": "Rust", "snippet": null, "link": "https://rust-lang.org"},
                {"title": "Tokio", "snippet": "Async runtime", "link": null},
                "not a hit",
                {"title": 42}
            ]
        }));
        let result = SearchParser { query: "rust" }.parse(raw).unwrap();
        assert!(result.success);
        assert_eq!(result.summary, "Found 2 search results for \"rust\"");
        let hits = hits(&result);
        assert_eq!(hits[0].snippet, "");
        assert_eq!(hits[0].link, "https://rust-lang.org");
        assert_eq!(hits[1].snippet, "Async runtime");
        assert_eq!(hits[1].link, "");
    }

    #[test]
    fn test_parse_rejects_text() {
        let raw = RawResponse::Text("<html>".into());
        assert!(SearchParser { query: "x" }.parse(raw).is_err());
    }

    #[tokio::test]
    async fn test_search_sends_query_and_count() {
        let transport = MockTransport::new().json("https://s.example", json!({"results": []}));
        let client = client_with(&[("google_search", "https://s.example")], transport.clone());
        let result = search(&client, "latest ai news", 5).await;
        assert!(result.success);
        assert_eq!(
            transport.requests(),
            vec!["https://s.example?q=latest%20ai%20news&num=5".to_string()]
        );
    }

    #[tokio::test]
    async fn test_search_network_failure() {
        let transport = MockTransport::new().fail("https://s.example", "dns failure for s.example");
        let client = client_with(&[("google_search", "https://s.example")], transport);
        let result = search(&client, "x", 5).await;
        assert!(!result.success);
        assert_eq!(
            result.summary,
            "[failed] Search failed: the service is unavailable right now."
        );
    }
}
