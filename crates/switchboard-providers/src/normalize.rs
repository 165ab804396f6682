//! Provider-specific response shapes → uniform [`ProviderResult`].
//!
//! Each capability module implements [`ResponseParser`] for its provider.
//! [`normalize`] is the single place where provider errors become failed
//! results, so nothing raw reaches a user-facing summary.

use serde_json::Value;
use switchboard_core::{
    envelope::{ProviderResult, RawResponse},
    error::SwitchboardError,
};
use tracing::warn;

/// Parses one provider's raw response.
pub trait ResponseParser {
    /// What the call does, as used in failure summaries ("Weather lookup").
    fn action(&self) -> &str;

    /// Extract the uniform envelope, or fail with a `Normalization` error.
    fn parse(&self, raw: RawResponse) -> Result<ProviderResult, SwitchboardError>;
}

/// Run `parser` over a call outcome, converting every error into a failed result.
pub fn normalize(
    provider: &str,
    outcome: Result<RawResponse, SwitchboardError>,
    parser: &dyn ResponseParser,
) -> ProviderResult {
    match outcome.and_then(|raw| parser.parse(raw)) {
        Ok(result) => result,
        Err(e) => {
            warn!("{provider}: {} failed: {e}", parser.action());
            ProviderResult::failed(parser.action(), &e)
        }
    }
}

/// Render a scalar JSON value for display: strings unquoted, `null`/missing as `N/A`.
pub fn display(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "N/A".to_string(),
        Some(Value::String(s)) if s.trim().is_empty() => "N/A".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// A non-empty string field, or the whole body when it is plain text / a JSON string.
///
/// Mirrors providers that answer either `{"<field>": "..."}` or the bare value.
pub(crate) fn field_or_body(raw: &RawResponse, field: &str) -> Option<String> {
    let text = match raw {
        RawResponse::Json(Value::Object(map)) => match map.get(field) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => return None,
            Some(other) => other.to_string(),
        },
        RawResponse::Json(Value::String(s)) => s.clone(),
        RawResponse::Text(t) => t.clone(),
        RawResponse::Json(_) | RawResponse::Binary(_) => return None,
    };
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Shorthand for a shape mismatch.
pub(crate) fn unexpected(what: impl Into<String>) -> SwitchboardError {
    SwitchboardError::Normalization(what.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use switchboard_core::envelope::FAILURE_MARK;

    struct Echo;

    impl ResponseParser for Echo {
        fn action(&self) -> &str {
            "Echo"
        }

        fn parse(&self, raw: RawResponse) -> Result<ProviderResult, SwitchboardError> {
            let text = field_or_body(&raw, "echo").ok_or_else(|| unexpected("no echo"))?;
            Ok(ProviderResult::ok(text, None))
        }
    }

    #[test]
    fn test_normalize_success() {
        let result = normalize("echo", Ok(RawResponse::Json(json!({"echo": "hi"}))), &Echo);
        assert!(result.success);
        assert_eq!(result.summary, "hi");
    }

    #[test]
    fn test_normalize_shape_error_is_data_not_available() {
        let result = normalize("echo", Ok(RawResponse::Json(json!({"other": 1}))), &Echo);
        assert!(!result.success);
        assert_eq!(result.summary, "[failed] Echo failed: data not available.");
    }

    #[test]
    fn test_normalize_call_error_never_leaks() {
        let err = SwitchboardError::Network("connection refused (os error 111)".into());
        let result = normalize("echo", Err(err), &Echo);
        assert!(result.summary.starts_with(FAILURE_MARK));
        assert!(!result.summary.contains("os error"));
        assert!(result.error.unwrap().contains("os error"));
    }

    #[test]
    fn test_display_scalars() {
        assert_eq!(display(Some(&json!("Sunny"))), "Sunny");
        assert_eq!(display(Some(&json!(21.5))), "21.5");
        assert_eq!(display(Some(&json!(null))), "N/A");
        assert_eq!(display(None), "N/A");
    }

    #[test]
    fn test_field_or_body() {
        let raw = RawResponse::Json(json!({"translatedText": " hola "}));
        assert_eq!(field_or_body(&raw, "translatedText").as_deref(), Some("hola"));
        let raw = RawResponse::Text("bonjour".into());
        assert_eq!(field_or_body(&raw, "translatedText").as_deref(), Some("bonjour"));
        let raw = RawResponse::Json(json!({"translatedText": ""}));
        assert_eq!(field_or_body(&raw, "translatedText"), None);
        let raw = RawResponse::Json(json!([1, 2]));
        assert_eq!(field_or_body(&raw, "translatedText"), None);
    }
}
