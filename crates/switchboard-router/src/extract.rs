//! Parameter extraction.
//!
//! Each intent owns an ordered list of patterns; the first one that matches
//! and yields a non-empty capture wins. A miss is an extraction error and the
//! dispatcher answers with a usage hint instead of calling a provider.

use std::sync::LazyLock;

use regex::Regex;
use switchboard_core::error::SwitchboardError;

use crate::intent::Intent;

/// How a matched pattern becomes a value.
#[derive(Debug, Clone, Copy)]
enum Capture {
    /// Group 1, trimmed.
    Trimmed,
    /// Group 1 as matched.
    Exact,
}

struct Pattern {
    regex: Regex,
    capture: Capture,
}

fn patterns(list: &[(&str, Capture)]) -> Vec<Pattern> {
    list.iter()
        .map(|(src, capture)| Pattern {
            regex: Regex::new(src).expect("Invalid extraction regex"),
            capture: *capture,
        })
        .collect()
}

static SEARCH_PATTERNS: LazyLock<Vec<Pattern>> = LazyLock::new(|| {
    patterns(&[
        (r"(?i)search\s+(?:for\s+)?(.+)", Capture::Trimmed),
        (r"(?i)google\s+(.+)", Capture::Trimmed),
        (r"(?i)find\s+(.+)", Capture::Trimmed),
        (r"(?i)look\s+(?:up\s+)?(.+)", Capture::Trimmed),
    ])
});

static LOCATION_PATTERNS: LazyLock<Vec<Pattern>> = LazyLock::new(|| {
    patterns(&[
        (r"(?i)weather\s+(?:in\s+|for\s+)?(.+)", Capture::Trimmed),
        (r"(?i)temperature\s+(?:in\s+|for\s+)?(.+)", Capture::Trimmed),
        (r"(?i)forecast\s+(?:in\s+|for\s+)?(.+)", Capture::Trimmed),
    ])
});

static TRANSLATION_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r#"(?i)translate\s+"?([^"]+)"?\s+to\s+(\w+)"#,
        r"(?i)translate\s+(.+)\s+to\s+(\w+)",
    ]
    .iter()
    .map(|src| Regex::new(src).expect("Invalid translation regex"))
    .collect()
});

static YOUTUBE_PATTERNS: LazyLock<Vec<Pattern>> = LazyLock::new(|| {
    patterns(&[
        (r"(?i)(https?://(?:www\.)?youtube\.com/watch\?v=[\w-]+)", Capture::Exact),
        (r"(?i)(https?://youtu\.be/[\w-]+)", Capture::Exact),
    ])
});

static PHONE_NUMBER_PATTERNS: LazyLock<Vec<Pattern>> = LazyLock::new(|| {
    patterns(&[(
        r"(\+?\d{1,4}[-.\s]?\(?\d{1,3}\)?[-.\s]?\d{1,4}[-.\s]?\d{1,4}[-.\s]?\d{1,9})",
        Capture::Exact,
    )])
});

static PHONE_MODEL_PATTERNS: LazyLock<Vec<Pattern>> = LazyLock::new(|| {
    patterns(&[
        (r"(?i)(?:specs|info|specifications)\s+(?:for\s+)?(.+)", Capture::Trimmed),
        (r"(?i)(.+)\s+(?:specs|info|specifications)", Capture::Trimmed),
    ])
});

fn first_match(patterns: &[Pattern], message: &str) -> Option<String> {
    patterns.iter().find_map(|p| {
        let caps = p.regex.captures(message)?;
        let group = caps.get(1)?.as_str();
        let value = match p.capture {
            Capture::Trimmed => group.trim(),
            Capture::Exact => group,
        };
        (!value.is_empty()).then(|| value.to_string())
    })
}

/// Text and target language of a translation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRequest {
    pub text: String,
    /// Lowercased.
    pub target_lang: String,
}

pub fn search_query(message: &str) -> Option<String> {
    first_match(&SEARCH_PATTERNS, message)
}

pub fn location(message: &str) -> Option<String> {
    first_match(&LOCATION_PATTERNS, message)
}

/// `translate <text> to <lang>`, optionally with the text in double quotes.
pub fn translation(message: &str) -> Option<TranslationRequest> {
    TRANSLATION_PATTERNS.iter().find_map(|re| {
        let caps = re.captures(message)?;
        let text = caps.get(1)?.as_str().trim();
        let lang = caps.get(2)?.as_str().to_lowercase();
        (!text.is_empty()).then(|| TranslationRequest {
            text: text.to_string(),
            target_lang: lang,
        })
    })
}

pub fn youtube_url(message: &str) -> Option<String> {
    first_match(&YOUTUBE_PATTERNS, message)
}

pub fn phone_number(message: &str) -> Option<String> {
    first_match(&PHONE_NUMBER_PATTERNS, message)
}

pub fn phone_model(message: &str) -> Option<String> {
    first_match(&PHONE_MODEL_PATTERNS, message)
}

/// Parameters pulled from a message, one variant per intent family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Params {
    Query(String),
    Location(String),
    Translation(TranslationRequest),
    VideoUrl(String),
    PhoneNumber(String),
    PhoneModel(String),
    Message(String),
}

/// Extract the parameters `intent` needs from `message`.
///
/// Fails with [`SwitchboardError::Extraction`] carrying the usage hint for
/// the intent.
pub fn extract(intent: Intent, message: &str) -> Result<Params, SwitchboardError> {
    let params = match intent {
        Intent::Search => search_query(message).map(Params::Query),
        Intent::Weather => location(message).map(Params::Location),
        Intent::Translate => translation(message).map(Params::Translation),
        Intent::YoutubeTranscribe | Intent::YoutubeSummarize => {
            youtube_url(message).map(Params::VideoUrl)
        }
        Intent::PhoneLookup => phone_number(message).map(Params::PhoneNumber),
        Intent::PhoneInfo => phone_model(message).map(Params::PhoneModel),
        Intent::Chat => {
            let trimmed = message.trim();
            (!trimmed.is_empty()).then(|| Params::Message(trimmed.to_string()))
        }
    };
    params.ok_or_else(|| SwitchboardError::Extraction(usage_hint(intent).to_string()))
}

/// What to tell the user when a parameter is missing.
pub fn usage_hint(intent: Intent) -> &'static str {
    match intent {
        Intent::Search => "Please provide a search query. Example: \"Search for latest AI news\"",
        Intent::Weather => "Please specify a location. Example: \"Weather in New York\"",
        Intent::Translate => {
            "Please provide text to translate. Example: \"Translate hello to Spanish\""
        }
        Intent::YoutubeTranscribe | Intent::YoutubeSummarize => {
            "Please provide a valid YouTube URL. Example: \"https://youtu.be/VIDEO_ID\""
        }
        Intent::PhoneLookup => "Please provide a phone number. Example: \"+1234567890\"",
        Intent::PhoneInfo => "Please specify a phone model. Example: \"Phone specs for iPhone 15\"",
        Intent::Chat => "Please send a message.",
    }
}
