//! Translation through the primary or the alternate provider.
//!
//! The two providers differ only in the name of the target-language
//! parameter. Choosing when to fall back is up to the caller.

use serde_json::json;
use switchboard_core::{
    envelope::{ProviderResult, RawResponse},
    error::SwitchboardError,
};

use crate::{
    client::{ApiClient, Expect},
    names::{TRANSLATOR, TRANSLATOR_ALT},
    normalize::{field_or_body, normalize, unexpected, ResponseParser},
};

/// Expects `{"translatedText": "..."}` or the translation as the whole body.
pub struct TranslationParser<'a> {
    pub target_lang: &'a str,
}

impl ResponseParser for TranslationParser<'_> {
    fn action(&self) -> &str {
        "Translation"
    }

    fn parse(&self, raw: RawResponse) -> Result<ProviderResult, SwitchboardError> {
        let translated = field_or_body(&raw, "translatedText")
            .ok_or_else(|| unexpected("translation response has no text"))?;
        let summary = format!("Translated to {}: {translated}", self.target_lang);
        Ok(ProviderResult::ok(
            summary,
            Some(json!({
                "translatedText": translated,
                "targetLanguage": self.target_lang,
            })),
        ))
    }
}

/// Translate with the primary provider.
pub async fn translate(client: &ApiClient, text: &str, target_lang: &str) -> ProviderResult {
    let outcome = client
        .call(
            TRANSLATOR,
            "",
            &[("text", text), ("target_language", target_lang)],
            Expect::Auto,
        )
        .await;
    normalize(TRANSLATOR, outcome, &TranslationParser { target_lang })
}

/// Translate with the alternate provider.
pub async fn translate_alt(client: &ApiClient, text: &str, target_lang: &str) -> ProviderResult {
    let outcome = client
        .call(
            TRANSLATOR_ALT,
            "",
            &[("text", text), ("targetLang", target_lang)],
            Expect::Auto,
        )
        .await;
    normalize(TRANSLATOR_ALT, outcome, &TranslationParser { target_lang })
}

/// The translated text of a successful result.
pub fn translated_text(result: &ProviderResult) -> Option<&str> {
    result
        .data
        .as_ref()
        .and_then(|d| d.get("translatedText"))
        .and_then(|t| t.as_str())
}
