//! Uniform result shapes passed between provider clients and the dispatcher.

use serde::{Deserialize, Serialize};

use crate::error::SwitchboardError;

/// Marker that starts every failure summary.
pub const FAILURE_MARK: &str = "[failed]";

/// A decoded provider response body, chosen by declared content type.
#[derive(Debug, Clone, PartialEq)]
pub enum RawResponse {
    Json(serde_json::Value),
    Text(String),
    Binary(Vec<u8>),
}

impl RawResponse {
    /// Borrow the JSON value, if this is a JSON body.
    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Json(v) => Some(v),
            _ => None,
        }
    }
}

/// Coarse failure category, used to decide whether a fallback is worth trying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Config,
    RateLimited,
    Provider,
}

impl From<&SwitchboardError> for FailureKind {
    fn from(err: &SwitchboardError) -> Self {
        match err {
            SwitchboardError::Config(_) => Self::Config,
            SwitchboardError::RateLimited { .. } => Self::RateLimited,
            _ => Self::Provider,
        }
    }
}

/// Normalized outcome of one provider call.
///
/// A failed result always carries a non-empty, display-safe `summary`;
/// `error` holds the internal detail and is only logged.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderResult {
    pub success: bool,
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureKind>,
    /// Binary payload (TTS audio).
    #[serde(skip)]
    pub audio: Option<Vec<u8>>,
}

impl ProviderResult {
    /// A successful result with a summary and optional structured data.
    pub fn ok(summary: impl Into<String>, data: Option<serde_json::Value>) -> Self {
        Self {
            success: true,
            summary: summary.into(),
            data,
            error: None,
            failure: None,
            audio: None,
        }
    }

    /// A failed result for `action` (e.g. "Weather lookup").
    ///
    /// The summary is built from [`SwitchboardError::user_message`], so the
    /// raw error text only lands in `error`.
    pub fn failed(action: &str, err: &SwitchboardError) -> Self {
        Self {
            success: false,
            summary: format!("{FAILURE_MARK} {action} failed: {}.", err.user_message()),
            data: None,
            error: Some(err.to_string()),
            failure: Some(FailureKind::from(err)),
            audio: None,
        }
    }

    /// Attach a binary payload.
    pub fn with_audio(mut self, audio: Vec<u8>) -> Self {
        self.audio = Some(audio);
        self
    }

    /// Whether a fallback provider could plausibly succeed where this one failed.
    pub fn is_provider_failure(&self) -> bool {
        !self.success && self.failure == Some(FailureKind::Provider)
    }
}

/// What the dispatcher hands back to the messaging front end.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reply {
    pub text_response: String,
    pub audio_response: Option<Vec<u8>>,
}

impl Reply {
    /// A text-only reply.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text_response: text.into(),
            audio_response: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_result_has_safe_summary() {
        let err = SwitchboardError::Network("dns error: no such host api.example".into());
        let result = ProviderResult::failed("Search", &err);
        assert!(!result.success);
        assert!(result.summary.starts_with(FAILURE_MARK));
        assert!(!result.summary.contains("dns"));
        assert_eq!(result.failure, Some(FailureKind::Provider));
        assert!(result.error.as_deref().unwrap_or_default().contains("dns"));
    }

    #[test]
    fn test_config_failure_is_not_provider_failure() {
        let err = SwitchboardError::not_enabled("Translation");
        let result = ProviderResult::failed("Translation", &err);
        assert!(!result.is_provider_failure());
        assert_eq!(
            result.summary,
            "[failed] Translation failed: Translation is not enabled."
        );
    }
}
