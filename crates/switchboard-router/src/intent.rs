//! Keyword intent classifier.
//!
//! Rules are evaluated top to bottom and the first match wins. YouTube links
//! are checked before the generic keywords so a link plus "summarize" never
//! lands in search.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What the user is asking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Search,
    Weather,
    Translate,
    YoutubeTranscribe,
    YoutubeSummarize,
    PhoneLookup,
    PhoneInfo,
    Chat,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Search => "search",
            Self::Weather => "weather",
            Self::Translate => "translate",
            Self::YoutubeTranscribe => "youtube_transcribe",
            Self::YoutubeSummarize => "youtube_summarize",
            Self::PhoneLookup => "phone_lookup",
            Self::PhoneInfo => "phone_info",
            Self::Chat => "chat",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification of one message.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IntentResult {
    pub intent: Intent,
    /// Fixed per rule, in `[0, 1]`.
    pub confidence: f32,
}

const YOUTUBE_KW: &[&str] = &["youtube.com", "youtu.be"];
const SUMMARIZE_KW: &[&str] = &["summarize", "summary"];
const WEATHER_KW: &[&str] = &["weather", "temperature", "forecast"];
const TRANSLATE_KW: &[&str] = &["translate", "translation"];
const PHONE_LOOKUP_KW: &[&str] = &["phone number", "truecaller"];
const PHONE_INFO_KW: &[&str] = &["phone specs", "phone info"];
const SEARCH_KW: &[&str] = &["search", "google", "find"];

/// A rule matches when every keyword group has at least one hit.
struct Rule {
    all_of: &'static [&'static [&'static str]],
    intent: Intent,
    confidence: f32,
}

/// Priority order matters.
const RULES: &[Rule] = &[
    Rule {
        all_of: &[YOUTUBE_KW, SUMMARIZE_KW],
        intent: Intent::YoutubeSummarize,
        confidence: 0.9,
    },
    Rule {
        all_of: &[YOUTUBE_KW],
        intent: Intent::YoutubeTranscribe,
        confidence: 0.8,
    },
    Rule {
        all_of: &[WEATHER_KW],
        intent: Intent::Weather,
        confidence: 0.9,
    },
    Rule {
        all_of: &[TRANSLATE_KW],
        intent: Intent::Translate,
        confidence: 0.9,
    },
    Rule {
        all_of: &[PHONE_LOOKUP_KW],
        intent: Intent::PhoneLookup,
        confidence: 0.8,
    },
    Rule {
        all_of: &[PHONE_INFO_KW],
        intent: Intent::PhoneInfo,
        confidence: 0.8,
    },
    Rule {
        all_of: &[SEARCH_KW],
        intent: Intent::Search,
        confidence: 0.8,
    },
];

const FALLBACK: IntentResult = IntentResult {
    intent: Intent::Chat,
    confidence: 0.5,
};

/// Check if any keyword in the list is contained in the lowercased message.
fn kw_match(msg_lower: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|kw| msg_lower.contains(kw))
}

/// Classify a message. Pure and case-insensitive.
pub fn classify(message: &str) -> IntentResult {
    let msg_lower = message.to_lowercase();
    RULES
        .iter()
        .find(|rule| rule.all_of.iter().all(|group| kw_match(&msg_lower, group)))
        .map(|rule| IntentResult {
            intent: rule.intent,
            confidence: rule.confidence,
        })
        .unwrap_or(FALLBACK)
}
