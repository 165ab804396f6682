//! # switchboard-providers
//!
//! Rate-limited HTTP clients for the external APIs Switchboard routes to,
//! plus the per-provider normalizers that turn their responses into
//! [`ProviderResult`](switchboard_core::envelope::ProviderResult)s.

pub mod chat;
pub mod client;
pub mod http;
pub mod normalize;
pub mod pdf;
pub mod phone;
pub mod rate_limit;
pub mod search;
pub mod status;
pub mod translate;
pub mod tts;
pub mod weather;
pub mod youtube;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use client::ApiClient;
pub use rate_limit::RateLimiter;

/// Provider names as they appear under `[apis]` in the config file.
pub mod names {
    pub const GOOGLE_SEARCH: &str = "google_search";
    pub const WEATHER: &str = "weather";
    pub const TRANSLATOR: &str = "translator";
    pub const TRANSLATOR_ALT: &str = "translator_alt";
    pub const YOUTUBE_TRANSCRIBE: &str = "youtube_transcribe";
    pub const YOUTUBE_SUMMARIZER: &str = "youtube_summarizer";
    pub const TRUECALLER: &str = "truecaller";
    pub const PHONE_INFO: &str = "phone_info";
    pub const IMAGE_TO_PDF: &str = "image_to_pdf";
    pub const TTS: &str = "tts";
    pub const CHAT: &str = "chat";
}

/// Human-readable label for a provider name, used in user-facing messages.
pub fn label(name: &str) -> &'static str {
    match name {
        names::GOOGLE_SEARCH => "Google Search",
        names::WEATHER => "Weather",
        names::TRANSLATOR => "Translation",
        names::TRANSLATOR_ALT => "Alternate translation",
        names::YOUTUBE_TRANSCRIBE => "YouTube transcription",
        names::YOUTUBE_SUMMARIZER => "YouTube summarizer",
        names::TRUECALLER => "Phone lookup",
        names::PHONE_INFO => "Phone info",
        names::IMAGE_TO_PDF => "Image to PDF",
        names::TTS => "Text to speech",
        names::CHAT => "Chat",
        _ => "This service",
    }
}
