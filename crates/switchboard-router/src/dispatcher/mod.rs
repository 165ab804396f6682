//! Message dispatcher.
//!
//! One message in, one [`Reply`] out: commands, classification, context,
//! extraction, at most one provider call (plus the translation fallback),
//! formatting and optional voice. Failures never escape; the caller always
//! gets text.


use std::sync::Arc;

use switchboard_core::{
    config::{Config, SwitchboardConfig},
    envelope::{ProviderResult, Reply},
    error::SwitchboardError,
    traits::{ConfigSource, HttpTransport, PreferenceStore, Synthesizer},
};
use switchboard_providers::{
    chat, names, phone, search, translate, tts::TtsSynthesizer, weather, youtube, ApiClient,
    RateLimiter,
};
use tracing::{debug, error, info, warn};

use crate::{
    commands::{self, Command, CommandContext},
    context::ConversationStore,
    extract::{self, Params, TranslationRequest},
    format,
    intent::{classify, Intent},
};

/// Reply used when something unexpected goes wrong.
pub const GENERIC_FAILURE: &str =
    "Sorry, I encountered an error processing your request. Please try again.";

/// Tunables taken from `[switchboard]`.
#[derive(Debug, Clone)]
pub struct DispatchSettings {
    pub bot_name: String,
    pub search_results: usize,
    pub summary_word_count: u32,
    /// Replies at or above this many characters are never voiced.
    pub voice_text_limit: usize,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self::from(&SwitchboardConfig::default())
    }
}

impl From<&SwitchboardConfig> for DispatchSettings {
    fn from(cfg: &SwitchboardConfig) -> Self {
        Self {
            bot_name: cfg.name.clone(),
            search_results: cfg.search_results,
            summary_word_count: cfg.summary_word_count,
            voice_text_limit: cfg.voice_text_limit,
        }
    }
}

pub struct Dispatcher {
    client: ApiClient,
    context: Arc<ConversationStore>,
    preferences: Arc<dyn PreferenceStore>,
    synthesizer: Arc<dyn Synthesizer>,
    settings: DispatchSettings,
}

impl Dispatcher {
    pub fn new(
        client: ApiClient,
        context: Arc<ConversationStore>,
        preferences: Arc<dyn PreferenceStore>,
        synthesizer: Arc<dyn Synthesizer>,
        settings: DispatchSettings,
    ) -> Self {
        Self {
            client,
            context,
            preferences,
            synthesizer,
            settings,
        }
    }

    /// Wire a dispatcher from a loaded config: providers and preferences
    /// come from `config`, voice goes through the configured TTS provider.
    pub fn from_config(config: Config, transport: Arc<dyn HttpTransport>) -> Self {
        let settings = DispatchSettings::from(&config.switchboard);
        let context = Arc::new(ConversationStore::new(config.switchboard.context_capacity));
        let limits = config.limits;
        let timeout = config.switchboard.request_timeout();
        let config = Arc::new(config);
        let client = ApiClient::new(
            config.clone(),
            transport,
            Arc::new(RateLimiter::new()),
            limits,
            timeout,
        );
        let synthesizer = Arc::new(TtsSynthesizer::new(client.clone()));
        Self::new(client, context, config, synthesizer, settings)
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn context(&self) -> &ConversationStore {
        &self.context
    }

    pub fn config(&self) -> &dyn ConfigSource {
        self.client.config()
    }

    /// Route one message and build the reply.
    pub async fn handle_message(&self, user_id: &str, message: &str) -> Reply {
        match self.route(user_id, message).await {
            Ok(reply) => reply,
            Err(e) => {
                error!("dispatch failed for {user_id}: {e}");
                Reply::text(GENERIC_FAILURE)
            }
        }
    }

    async fn route(&self, user_id: &str, message: &str) -> Result<Reply, SwitchboardError> {
        if let Some(cmd) = Command::parse(message) {
            debug!("command {cmd:?} from {user_id}");
            let ctx = CommandContext {
                config: self.client.config(),
                context: &self.context,
                user_id,
                bot_name: &self.settings.bot_name,
            };
            return Ok(Reply::text(commands::handle(cmd, &ctx)));
        }

        let classified = classify(message);
        info!(
            "{user_id}: intent {} ({:.1})",
            classified.intent, classified.confidence
        );
        self.context.append(user_id, message, classified.intent);

        let params = match extract::extract(classified.intent, message) {
            Ok(p) => p,
            Err(SwitchboardError::Extraction(hint)) => return Ok(Reply::text(hint)),
            Err(e) => return Err(e),
        };

        let model = match classified.intent {
            Intent::Chat => self.preferences.ai_model(user_id)?,
            _ => None,
        };
        let result = self.call(classified.intent, &params, model.as_deref()).await;
        if !result.success {
            return Ok(Reply::text(result.summary));
        }

        let text = render(classified.intent, &params, &result, &self.settings)?;
        let audio = self.voice(user_id, &text).await;
        Ok(Reply {
            text_response: text,
            audio_response: audio,
        })
    }

    /// The provider call for an intent. `model` selects the chat model.
    async fn call(&self, intent: Intent, params: &Params, model: Option<&str>) -> ProviderResult {
        let client = &self.client;
        match (intent, params) {
            (Intent::Search, Params::Query(q)) => {
                search::search(client, q, self.settings.search_results).await
            }
            (Intent::Weather, Params::Location(loc)) => weather::weather(client, loc).await,
            (Intent::Translate, Params::Translation(req)) => self.translate(req).await,
            (Intent::YoutubeTranscribe, Params::VideoUrl(url)) => {
                youtube::transcribe(client, url).await
            }
            (Intent::YoutubeSummarize, Params::VideoUrl(url)) => {
                youtube::summarize(client, url, self.settings.summary_word_count).await
            }
            (Intent::PhoneLookup, Params::PhoneNumber(n)) => phone::lookup(client, n).await,
            (Intent::PhoneInfo, Params::PhoneModel(m)) => phone::info(client, m).await,
            (Intent::Chat, Params::Message(m)) => chat::chat(client, m, model).await,
            (intent, params) => ProviderResult::failed(
                intent.as_str(),
                &SwitchboardError::Extraction(format!("{params:?} does not fit {intent}")),
            ),
        }
    }

    /// Primary translator, then the alternate when the primary failed at the
    /// provider and the alternate is enabled.
    async fn translate(&self, req: &TranslationRequest) -> ProviderResult {
        let primary = translate::translate(&self.client, &req.text, &req.target_lang).await;
        if !primary.is_provider_failure() || !self.client.is_enabled(names::TRANSLATOR_ALT) {
            return primary;
        }

        warn!("translation: primary failed, trying {}", names::TRANSLATOR_ALT);
        let alternate =
            translate::translate_alt(&self.client, &req.text, &req.target_lang).await;
        if alternate.success {
            alternate
        } else {
            primary
        }
    }

    /// Synthesized audio for `text` if the user wants voice and the text is short enough.
    async fn voice(&self, user_id: &str, text: &str) -> Option<Vec<u8>> {
        let pref = self.preferences.voice_preference(user_id);
        if !pref.enabled || text.chars().count() >= self.settings.voice_text_limit {
            return None;
        }
        let spoken = format::speakable(text);
        match self.synthesizer.synthesize(&spoken, &pref.voice).await {
            Ok(audio) if !audio.is_empty() => Some(audio),
            Ok(_) => None,
            Err(e) => {
                warn!("voice reply for {user_id} skipped: {e}");
                None
            }
        }
    }
}

/// Reply text for a successful result.
fn render(
    intent: Intent,
    params: &Params,
    result: &ProviderResult,
    settings: &DispatchSettings,
) -> Result<String, SwitchboardError> {
    let text = match (intent, params) {
        (Intent::Search, Params::Query(q)) => {
            format::search_results(q, result, settings.search_results)
        }
        (Intent::Weather, Params::Location(loc)) => format::weather(loc, result),
        (Intent::Translate, Params::Translation(req)) => {
            format::translation(&req.text, &req.target_lang, result)
        }
        (Intent::YoutubeTranscribe, _) => format::transcript(result),
        (Intent::YoutubeSummarize, _) => format::video_summary(result),
        (Intent::PhoneLookup, _) => format::record("Phone lookup results", result)?,
        (Intent::PhoneInfo, _) => format::record("Phone specifications", result)?,
        (Intent::Chat, _) => format::chat_reply(result),
        _ => result.summary.clone(),
    };
    Ok(text)
}
