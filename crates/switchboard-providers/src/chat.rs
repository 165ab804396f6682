//! Free-form chat, the fallback for messages no other intent claims.
//!
//! Two request styles are supported:
//! - `prompt` (default): `GET {endpoint}?prompt=...`, reply in
//!   `response`, `answer`, or `result`, else the raw body.
//! - `openai`: `POST {endpoint}/chat/completions` with an OpenAI-compatible body.
//!
//! A user may pick a model from `[ai_models]`; otherwise `[apis.chat]` answers.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use switchboard_core::{
    config::ProviderConfig,
    envelope::{ProviderResult, RawResponse},
    error::SwitchboardError,
    traits::HttpRequest,
};
use tracing::debug;

use crate::{
    client::{build_url, ApiClient, Expect},
    names::CHAT,
    normalize::{normalize, unexpected, ResponseParser},
};

const SYSTEM_PROMPT: &str = "You are a helpful assistant replying in a chat app. \
                             Answer concisely in the user's language.";

#[derive(Serialize, Deserialize, Clone)]
pub(crate) struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Serialize)]
pub(crate) struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
}

#[derive(Deserialize)]
pub(crate) struct ChatCompletionResponse {
    pub choices: Option<Vec<ChatChoice>>,
}

#[derive(Deserialize)]
pub(crate) struct ChatChoice {
    pub message: Option<ChatMessage>,
}

/// Request style, from the provider's `style` setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatStyle {
    Prompt,
    OpenAi,
}

impl ChatStyle {
    pub fn of(api: &ProviderConfig) -> Self {
        match api.style.as_deref() {
            Some("openai") => Self::OpenAi,
            _ => Self::Prompt,
        }
    }
}

/// Pulls the assistant reply out of either response style.
pub struct ChatParser {
    pub style: ChatStyle,
}

impl ResponseParser for ChatParser {
    fn action(&self) -> &str {
        "Chat"
    }

    fn parse(&self, raw: RawResponse) -> Result<ProviderResult, SwitchboardError> {
        let reply = match (self.style, raw) {
            (ChatStyle::OpenAi, RawResponse::Json(v)) => {
                let parsed: ChatCompletionResponse = serde_json::from_value(v)?;
                parsed
                    .choices
                    .as_ref()
                    .and_then(|c| c.first())
                    .and_then(|c| c.message.as_ref())
                    .map(|m| m.content.clone())
            }
            (ChatStyle::Prompt, RawResponse::Json(v)) => ["response", "answer", "result"]
                .iter()
                .find_map(|k| v.get(*k).and_then(Value::as_str).map(str::to_string))
                .or_else(|| match v {
                    Value::String(s) => Some(s),
                    Value::Null => None,
                    other => Some(other.to_string()),
                }),
            (_, RawResponse::Text(t)) => Some(t),
            (_, _) => None,
        };
        let reply = reply
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .ok_or_else(|| unexpected("chat provider returned no reply"))?;
        Ok(ProviderResult::ok(
            "Chat reply received",
            Some(json!({ "reply": reply })),
        ))
    }
}

/// Ask the chat provider, or the user's selected `model`, to answer `message`.
pub async fn chat(client: &ApiClient, message: &str, model: Option<&str>) -> ProviderResult {
    let acquired = match model {
        Some(name) => {
            debug!("chat: using selected model {name}");
            client.acquire_model(name)
        }
        None => client.acquire(CHAT),
    };
    let (style, outcome) = match acquired {
        Ok(api) => {
            let style = ChatStyle::of(&api);
            (style, send(client, &api, style, message).await)
        }
        Err(e) => (ChatStyle::Prompt, Err(e)),
    };
    normalize(CHAT, outcome, &ChatParser { style })
}

async fn send(
    client: &ApiClient,
    api: &ProviderConfig,
    style: ChatStyle,
    message: &str,
) -> Result<RawResponse, SwitchboardError> {
    let request = match style {
        ChatStyle::Prompt => {
            HttpRequest::get(build_url(&api.endpoint, "", &[("prompt", message)]), client.timeout())
        }
        ChatStyle::OpenAi => {
            let model = api.model.clone().unwrap_or_else(|| "gpt-4o-mini".to_string());
            debug!("chat: POST chat/completions model={model}");
            let body = ChatCompletionRequest {
                model,
                messages: vec![
                    ChatMessage {
                        role: "system".to_string(),
                        content: SYSTEM_PROMPT.to_string(),
                    },
                    ChatMessage {
                        role: "user".to_string(),
                        content: message.to_string(),
                    },
                ],
            };
            let url = format!("{}/chat/completions", api.endpoint.trim_end_matches('/'));
            let request = HttpRequest::post_json(url, serde_json::to_value(body)?, client.timeout());
            match &api.api_key {
                Some(key) if !key.is_empty() => request.with_bearer(key.clone()),
                _ => request,
            }
        }
    };
    client.fetch(request, Expect::Auto).await
}

/// The reply text of a successful chat result.
pub fn reply_text(result: &ProviderResult) -> Option<&str> {
    result
        .data
        .as_ref()
        .and_then(|d| d.get("reply"))
        .and_then(Value::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MODEL_UNAVAILABLE;
    use crate::testing::{client_from, config_with, MockTransport};
    use switchboard_core::traits::HttpMethod;

    #[test]
    fn test_prompt_style_field_order() {
        let parser = ChatParser {
            style: ChatStyle::Prompt,
        };
        let raw = RawResponse::Json(json!({"answer": "42", "result": "ignored"}));
        let result = parser.parse(raw).unwrap();
        assert_eq!(reply_text(&result), Some("42"));
    }

    #[test]
    fn test_prompt_style_unknown_shape_is_raw_json() {
        let parser = ChatParser {
            style: ChatStyle::Prompt,
        };
        let raw = RawResponse::Json(json!({"text": "hi"}));
        let result = parser.parse(raw).unwrap();
        assert_eq!(reply_text(&result), Some(r#"{"text":"hi"}"#));
    }

    #[test]
    fn test_openai_response_parsing() {
        let json = r#"{"choices":[{"message":{"role":"assistant","content":"Hello!"},"finish_reason":"stop"}],"model":"gpt-4o"}"#;
        let parser = ChatParser {
            style: ChatStyle::OpenAi,
        };
        let raw = RawResponse::Json(serde_json::from_str(json).unwrap());
        let result = parser.parse(raw).unwrap();
        assert_eq!(reply_text(&result), Some("Hello!"));
    }

    #[tokio::test]
    async fn test_chat_prompt_style_request() {
        let transport =
            MockTransport::new().json("https://ai.example", json!({"response": "Hi there"}));
        let client = client_from(config_with(&[("chat", "https://ai.example")]), transport.clone());
        let result = chat(&client, "hello bot", None).await;
        assert_eq!(reply_text(&result), Some("Hi there"));
        assert_eq!(
            transport.requests(),
            vec!["https://ai.example?prompt=hello%20bot".to_string()]
        );
    }

    #[tokio::test]
    async fn test_chat_openai_style_request() {
        let mut config = config_with(&[("chat", "https://api.example/v1/")]);
        if let Some(api) = config.apis.get_mut("chat") {
            api.style = Some("openai".into());
            api.api_key = Some("sk-test".into());
            api.model = Some("gpt-4o".into());
        }
        let transport = MockTransport::new().json(
            "https://api.example/v1/chat/completions",
            json!({"choices": [{"message": {"role": "assistant", "content": "Sure."}}]}),
        );
        let client = client_from(config, transport.clone());
        let result = chat(&client, "help me", None).await;
        assert_eq!(reply_text(&result), Some("Sure."));

        let sent = transport.sent();
        assert_eq!(sent[0].method, HttpMethod::Post);
        assert_eq!(sent[0].bearer.as_deref(), Some("sk-test"));
        let body = sent[0].json.as_ref().unwrap();
        assert_eq!(body["model"], "gpt-4o");
        assert_eq!(body["messages"][1]["content"], "help me");
    }

    #[tokio::test]
    async fn test_chat_uses_selected_model() {
        let mut config = config_with(&[("chat", "https://ai.example")]);
        let mut claude = ProviderConfig::enabled("https://claude.example/v1");
        claude.style = Some("openai".into());
        claude.model = Some("claude-sonnet".into());
        config.ai_models.insert("claude".into(), claude);
        let transport = MockTransport::new().json(
            "https://claude.example/v1/chat/completions",
            json!({"choices": [{"message": {"role": "assistant", "content": "Bonjour."}}]}),
        );
        let client = client_from(config, transport.clone());

        let result = chat(&client, "say hi", Some("claude")).await;
        assert_eq!(reply_text(&result), Some("Bonjour."));
        let sent = transport.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].json.as_ref().unwrap()["model"], "claude-sonnet");
    }

    #[tokio::test]
    async fn test_chat_unknown_model_fails_without_request() {
        let transport = MockTransport::new().json("https://ai.example", json!({"response": "hi"}));
        let client = client_from(config_with(&[("chat", "https://ai.example")]), transport.clone());

        let result = chat(&client, "say hi", Some("gemini")).await;
        assert!(!result.success);
        assert_eq!(
            result.summary,
            format!("[failed] Chat failed: {MODEL_UNAVAILABLE}.")
        );
        assert!(transport.requests().is_empty());
    }
}
