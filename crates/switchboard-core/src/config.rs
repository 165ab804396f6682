use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::time::Duration;

use crate::{
    error::SwitchboardError,
    traits::{ConfigSource, PreferenceStore, VoicePreference},
};

/// Voice used when a user enables voice replies without picking one.
pub const DEFAULT_VOICE: &str = "Salli";

/// Top-level Switchboard configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub switchboard: SwitchboardConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
    /// External APIs keyed by provider name (`google_search`, `weather`, ...).
    #[serde(default)]
    pub apis: BTreeMap<String, ProviderConfig>,
    /// Chat models users can pick instead of `[apis.chat]`.
    #[serde(default)]
    pub ai_models: BTreeMap<String, ProviderConfig>,
    /// Per-user settings keyed by opaque user id.
    #[serde(default)]
    pub users: HashMap<String, UserConfig>,
}

/// General settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwitchboardConfig {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Directory for rolling log files. Empty = stderr only.
    #[serde(default)]
    pub log_dir: String,
    /// Per-request HTTP timeout (default: 10 seconds).
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    /// Replies at or above this many characters are never spoken.
    #[serde(default = "default_voice_text_limit")]
    pub voice_text_limit: usize,
    /// Conversation entries kept per user.
    #[serde(default = "default_context_capacity")]
    pub context_capacity: usize,
    #[serde(default = "default_search_results")]
    pub search_results: usize,
    /// Target length for YouTube summaries.
    #[serde(default = "default_summary_word_count")]
    pub summary_word_count: u32,
}

impl Default for SwitchboardConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            log_level: default_log_level(),
            log_dir: String::new(),
            request_timeout_secs: default_request_timeout(),
            voice_text_limit: default_voice_text_limit(),
            context_capacity: default_context_capacity(),
            search_results: default_search_results(),
            summary_word_count: default_summary_word_count(),
        }
    }
}

impl SwitchboardConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Default fixed-window rate limit, applied per provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitsConfig {
    #[serde(default = "default_max_requests")]
    pub max_requests: u32,
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_requests: default_max_requests(),
            window_secs: default_window_secs(),
        }
    }
}

/// One external API endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub endpoint: String,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub description: String,
    /// Override of `[limits].max_requests` for this provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_requests: Option<u32>,
    /// Override of `[limits].window_secs` for this provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_secs: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Request style for the chat provider: `prompt` (default) or `openai`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
}

impl ProviderConfig {
    /// An enabled endpoint with no overrides.
    pub fn enabled(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            enabled: true,
            description: String::new(),
            max_requests: None,
            window_secs: None,
            api_key: None,
            model: None,
            style: None,
        }
    }

    /// Effective `(max_requests, window)` given the global defaults.
    pub fn limit(&self, defaults: &LimitsConfig) -> (u32, Duration) {
        (
            self.max_requests.unwrap_or(defaults.max_requests),
            Duration::from_secs(self.window_secs.unwrap_or(defaults.window_secs)),
        )
    }
}

/// Per-user settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserConfig {
    /// Reply with synthesized audio as well as text.
    #[serde(default)]
    pub voice: bool,
    #[serde(default = "default_voice")]
    pub voice_name: String,
    /// Name of an `[ai_models]` entry to chat with.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_model: Option<String>,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            voice: false,
            voice_name: default_voice(),
            ai_model: None,
        }
    }
}

impl ConfigSource for Config {
    fn enabled_providers(&self) -> BTreeMap<String, ProviderConfig> {
        self.apis
            .iter()
            .filter(|(_, api)| api.enabled)
            .map(|(name, api)| (name.clone(), api.clone()))
            .collect()
    }

    fn get(&self, path: &str) -> Option<ProviderConfig> {
        let name = path.strip_prefix("apis.").unwrap_or(path);
        self.apis.get(name).cloned()
    }

    fn chat_model(&self, name: &str) -> Option<ProviderConfig> {
        self.ai_models.get(name).cloned()
    }
}

impl PreferenceStore for Config {
    fn voice_preference(&self, user_id: &str) -> VoicePreference {
        self.users
            .get(user_id)
            .map(|u| VoicePreference {
                enabled: u.voice,
                voice: u.voice_name.clone(),
            })
            .unwrap_or_default()
    }

    fn ai_model(&self, user_id: &str) -> Result<Option<String>, SwitchboardError> {
        Ok(self
            .users
            .get(user_id)
            .and_then(|u| u.ai_model.clone())
            .filter(|name| !name.trim().is_empty()))
    }
}

// --- Default value functions ---

fn default_name() -> String {
    "Switchboard".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_request_timeout() -> u64 {
    10
}
fn default_voice_text_limit() -> usize {
    500
}
fn default_context_capacity() -> usize {
    10
}
fn default_search_results() -> usize {
    5
}
fn default_summary_word_count() -> u32 {
    200
}
fn default_max_requests() -> u32 {
    30
}
fn default_window_secs() -> u64 {
    60
}
fn default_voice() -> String {
    DEFAULT_VOICE.to_string()
}

/// Expand `~` to home directory.
pub fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return format!("{}/{rest}", home.to_string_lossy());
        }
    }
    path.to_string()
}

/// Load configuration from a TOML file.
///
/// Falls back to defaults if the file does not exist; with defaults every
/// provider is absent and therefore disabled.
pub fn load(path: &str) -> Result<Config, SwitchboardError> {
    let expanded = shellexpand(path);
    let path = Path::new(&expanded);
    if !path.exists() {
        tracing::info!(
            "Config file not found at {}, using defaults",
            path.display()
        );
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path).map_err(|e| {
        SwitchboardError::Config(format!("failed to read {}: {}", path.display(), e))
    })?;

    let config: Config = toml::from_str(&content)
        .map_err(|e| SwitchboardError::Config(format!("failed to parse config: {}", e)))?;

    for (name, api) in &config.apis {
        if api.enabled && api.endpoint.trim().is_empty() {
            tracing::warn!("provider {name} is enabled but has no endpoint");
        }
    }

    Ok(config)
}
