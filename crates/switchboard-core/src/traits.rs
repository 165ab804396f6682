use crate::{config::ProviderConfig, error::SwitchboardError};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::time::Duration;

/// HTTP verbs the provider clients need.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Head,
}

/// A single outgoing request.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    /// Bearer token for the `Authorization` header.
    pub bearer: Option<String>,
    /// JSON body (POST only).
    pub json: Option<serde_json::Value>,
    pub timeout: Duration,
}

impl HttpRequest {
    /// A plain GET.
    pub fn get(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            method: HttpMethod::Get,
            url: url.into(),
            bearer: None,
            json: None,
            timeout,
        }
    }

    /// A HEAD request.
    pub fn head(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            method: HttpMethod::Head,
            ..Self::get(url, timeout)
        }
    }

    /// A JSON POST.
    pub fn post_json(url: impl Into<String>, body: serde_json::Value, timeout: Duration) -> Self {
        Self {
            method: HttpMethod::Post,
            json: Some(body),
            ..Self::get(url, timeout)
        }
    }

    pub fn with_bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer = Some(token.into());
        self
    }
}

/// A response as seen by the provider client, before decoding.
#[derive(Debug, Clone, Default)]
pub struct HttpResponse {
    pub status: u16,
    pub status_text: String,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends one HTTP request.
///
/// Implementations return `Ok` for every response that arrived, whatever its
/// status; only connection failures and timeouts are errors here.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, SwitchboardError>;
}

/// Where provider endpoints come from. Consulted before every call.
pub trait ConfigSource: Send + Sync {
    /// All providers with `enabled = true`, keyed by name.
    fn enabled_providers(&self) -> BTreeMap<String, ProviderConfig>;

    /// Look up a provider by name (`weather`) or path (`apis.weather`).
    fn get(&self, path: &str) -> Option<ProviderConfig>;

    /// Look up a selectable chat model by name (`[ai_models.<name>]`).
    fn chat_model(&self, _name: &str) -> Option<ProviderConfig> {
        None
    }
}

/// A user's voice-reply preference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoicePreference {
    pub enabled: bool,
    pub voice: String,
}

impl Default for VoicePreference {
    fn default() -> Self {
        Self {
            enabled: false,
            voice: crate::config::DEFAULT_VOICE.to_string(),
        }
    }
}

/// Read-only view of per-user preferences.
pub trait PreferenceStore: Send + Sync {
    fn voice_preference(&self, user_id: &str) -> VoicePreference;

    /// The chat model a user picked, `None` for the default `[apis.chat]`.
    fn ai_model(&self, user_id: &str) -> Result<Option<String>, SwitchboardError>;
}

/// Text-to-speech synthesis.
#[async_trait]
pub trait Synthesizer: Send + Sync {
    async fn synthesize(&self, text: &str, voice: &str) -> Result<Vec<u8>, SwitchboardError>;
}
