//! Text-to-speech.

use async_trait::async_trait;
use switchboard_core::{
    envelope::{ProviderResult, RawResponse},
    error::SwitchboardError,
    traits::Synthesizer,
};

use crate::{
    client::{ApiClient, Expect},
    names::TTS,
    normalize::{unexpected, ResponseParser},
};

/// Expects a non-empty binary audio body.
pub struct SpeechParser<'a> {
    pub voice: &'a str,
}

impl ResponseParser for SpeechParser<'_> {
    fn action(&self) -> &str {
        "Text-to-speech"
    }

    fn parse(&self, raw: RawResponse) -> Result<ProviderResult, SwitchboardError> {
        match raw {
            RawResponse::Binary(audio) if !audio.is_empty() => Ok(ProviderResult::ok(
                format!("Text converted to speech using {} voice", self.voice),
                None,
            )
            .with_audio(audio)),
            _ => Err(unexpected("no audio in TTS response")),
        }
    }
}

/// [`Synthesizer`] backed by the configured TTS provider.
#[derive(Clone)]
pub struct TtsSynthesizer {
    client: ApiClient,
}

impl TtsSynthesizer {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Synthesizer for TtsSynthesizer {
    async fn synthesize(&self, text: &str, voice: &str) -> Result<Vec<u8>, SwitchboardError> {
        let outcome = self
            .client
            .call(TTS, "", &[("voice", voice), ("text", text)], Expect::Binary)
            .await?;
        SpeechParser { voice }
            .parse(outcome)?
            .audio
            .ok_or_else(|| unexpected("no audio in TTS response"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{client_with, MockTransport};

    #[tokio::test]
    async fn test_synthesizer_returns_audio() {
        let transport = MockTransport::new().bytes("https://tts.example", b"ID3audio");
        let client = client_with(&[("tts", "https://tts.example")], transport.clone());
        let synth = TtsSynthesizer::new(client);
        let audio = synth.synthesize("hello there", "Salli").await.unwrap();
        assert_eq!(audio, b"ID3audio".to_vec());
        assert_eq!(
            transport.requests(),
            vec!["https://tts.example?voice=Salli&text=hello%20there".to_string()]
        );
    }

    #[tokio::test]
    async fn test_synthesizer_empty_audio_is_error() {
        let transport = MockTransport::new().bytes("https://tts.example", b"");
        let client = client_with(&[("tts", "https://tts.example")], transport);
        let synth = TtsSynthesizer::new(client);
        let err = synth.synthesize("hi", "Salli").await.unwrap_err();
        assert!(matches!(err, SwitchboardError::Normalization(_)));
    }

    #[tokio::test]
    async fn test_synthesizer_disabled() {
        let synth = TtsSynthesizer::new(client_with(&[], MockTransport::new()));
        let err = synth.synthesize("hi", "Salli").await.unwrap_err();
        assert_eq!(err.user_message(), "Text to speech is not enabled");
    }

    #[test]
    fn test_speech_parser_attaches_audio() {
        let result = SpeechParser { voice: "Joanna" }
            .parse(RawResponse::Binary(vec![7, 8]))
            .unwrap();
        assert_eq!(result.summary, "Text converted to speech using Joanna voice");
        assert_eq!(result.audio, Some(vec![7, 8]));
    }
}
