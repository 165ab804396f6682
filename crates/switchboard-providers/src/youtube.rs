//! YouTube transcription and summarization.

use serde_json::json;
use switchboard_core::{
    envelope::{ProviderResult, RawResponse},
    error::SwitchboardError,
};

use crate::{
    client::{ApiClient, Expect},
    names::{YOUTUBE_SUMMARIZER, YOUTUBE_TRANSCRIBE},
    normalize::{field_or_body, normalize, unexpected, ResponseParser},
};

/// Expects `{"transcript": "..."}` or the transcript as the whole body.
pub struct TranscriptParser;

impl ResponseParser for TranscriptParser {
    fn action(&self) -> &str {
        "YouTube transcription"
    }

    fn parse(&self, raw: RawResponse) -> Result<ProviderResult, SwitchboardError> {
        let transcript = field_or_body(&raw, "transcript")
            .ok_or_else(|| unexpected("transcription response is empty"))?;
        Ok(ProviderResult::ok(
            "YouTube video transcribed successfully",
            Some(json!({ "transcript": transcript })),
        ))
    }
}

/// Expects `{"summary": "..."}` or the summary as the whole body.
pub struct VideoSummaryParser {
    pub word_count: u32,
}

impl ResponseParser for VideoSummaryParser {
    fn action(&self) -> &str {
        "YouTube summarization"
    }

    fn parse(&self, raw: RawResponse) -> Result<ProviderResult, SwitchboardError> {
        let summary = field_or_body(&raw, "summary")
            .ok_or_else(|| unexpected("summarizer response is empty"))?;
        Ok(ProviderResult::ok(
            "YouTube video summarized successfully",
            Some(json!({ "summary": summary, "wordCount": self.word_count })),
        ))
    }
}

pub async fn transcribe(client: &ApiClient, video_url: &str) -> ProviderResult {
    let outcome = client
        .call(YOUTUBE_TRANSCRIBE, "", &[("url", video_url)], Expect::Auto)
        .await;
    normalize(YOUTUBE_TRANSCRIBE, outcome, &TranscriptParser)
}

pub async fn summarize(client: &ApiClient, video_url: &str, word_count: u32) -> ProviderResult {
    let words = word_count.to_string();
    let outcome = client
        .call(
            YOUTUBE_SUMMARIZER,
            "",
            &[("url", video_url), ("wordCount", words.as_str())],
            Expect::Auto,
        )
        .await;
    normalize(YOUTUBE_SUMMARIZER, outcome, &VideoSummaryParser { word_count })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{client_with, MockTransport};

    #[tokio::test]
    async fn test_transcribe_encodes_url() {
        let transport =
            MockTransport::new().json("https://yt.example", json!({"transcript": "hello world"}));
        let client = client_with(&[("youtube_transcribe", "https://yt.example")], transport.clone());
        let result = transcribe(&client, "https://youtu.be/abc123").await;
        assert!(result.success);
        assert_eq!(result.data.unwrap()["transcript"], "hello world");
        assert_eq!(
            transport.requests(),
            vec!["https://yt.example?url=https%3A%2F%2Fyoutu.be%2Fabc123".to_string()]
        );
    }

    #[tokio::test]
    async fn test_summarize_sends_word_count() {
        let transport = MockTransport::new().text("https://sum.example", "A short video.");
        let client = client_with(&[("youtube_summarizer", "https://sum.example")], transport.clone());
        let result = summarize(&client, "https://youtu.be/x", 200).await;
        assert_eq!(result.data.unwrap()["summary"], "A short video.");
        assert!(transport.requests()[0].ends_with("&wordCount=200"));
    }

    #[tokio::test]
    async fn test_summarize_disabled() {
        let client = client_with(&[], MockTransport::new());
        let result = summarize(&client, "https://youtu.be/x", 200).await;
        assert_eq!(
            result.summary,
            "[failed] YouTube summarization failed: YouTube summarizer is not enabled."
        );
    }
}
