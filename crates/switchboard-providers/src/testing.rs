//! In-memory transport and client builders for tests.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use switchboard_core::{
    config::{Config, LimitsConfig, ProviderConfig},
    error::SwitchboardError,
    traits::{HttpRequest, HttpResponse, HttpTransport},
};

use crate::{client::ApiClient, rate_limit::RateLimiter};

#[derive(Clone)]
enum Canned {
    Response(HttpResponse),
    Fail(String),
}

/// Transport that answers from a prefix-matched route table and records
/// every request. Unmatched URLs get a 404.
#[derive(Clone, Default)]
pub struct MockTransport {
    routes: Arc<Mutex<Vec<(String, Canned)>>>,
    log: Arc<Mutex<Vec<HttpRequest>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer URLs starting with `prefix` with an arbitrary response.
    pub fn raw(self, prefix: &str, status: u16, content_type: Option<&str>, body: Vec<u8>) -> Self {
        let resp = HttpResponse {
            status,
            status_text: if (200..300).contains(&status) {
                "OK".to_string()
            } else {
                "Error".to_string()
            },
            content_type: content_type.map(str::to_string),
            body,
        };
        self.push(prefix, Canned::Response(resp))
    }

    pub fn json(self, prefix: &str, value: serde_json::Value) -> Self {
        let body = value.to_string().into_bytes();
        self.raw(prefix, 200, Some("application/json; charset=utf-8"), body)
    }

    pub fn text(self, prefix: &str, body: &str) -> Self {
        self.raw(prefix, 200, Some("text/plain"), body.as_bytes().to_vec())
    }

    pub fn bytes(self, prefix: &str, body: &[u8]) -> Self {
        self.raw(prefix, 200, Some("audio/mpeg"), body.to_vec())
    }

    pub fn status(self, prefix: &str, status: u16, status_text: &str) -> Self {
        let resp = HttpResponse {
            status,
            status_text: status_text.to_string(),
            content_type: Some("text/html".to_string()),
            body: b"<html>upstream exploded: trace id 42</html>".to_vec(),
        };
        self.push(prefix, Canned::Response(resp))
    }

    /// Fail URLs starting with `prefix` as a network error carrying `detail`.
    pub fn fail(self, prefix: &str, detail: &str) -> Self {
        self.push(prefix, Canned::Fail(detail.to_string()))
    }

    fn push(self, prefix: &str, canned: Canned) -> Self {
        self.routes
            .lock()
            .unwrap()
            .push((prefix.to_string(), canned));
        self
    }

    /// URLs requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.log.lock().unwrap().iter().map(|r| r.url.clone()).collect()
    }

    /// Full requests sent so far, in order.
    pub fn sent(&self) -> Vec<HttpRequest> {
        self.log.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, SwitchboardError> {
        self.log.lock().unwrap().push(request.clone());
        let routes = self.routes.lock().unwrap();
        match routes.iter().find(|(p, _)| request.url.starts_with(p.as_str())) {
            Some((_, Canned::Response(resp))) => Ok(resp.clone()),
            Some((_, Canned::Fail(detail))) => Err(SwitchboardError::Network(detail.clone())),
            None => Ok(HttpResponse {
                status: 404,
                status_text: "Not Found".to_string(),
                content_type: None,
                body: Vec::new(),
            }),
        }
    }
}

/// Config with the given `(name, endpoint)` providers enabled.
pub fn config_with(apis: &[(&str, &str)]) -> Config {
    let mut config = Config::default();
    for (name, endpoint) in apis {
        config
            .apis
            .insert(name.to_string(), ProviderConfig::enabled(*endpoint));
    }
    config
}

/// Client over `config_with(apis)` and `transport`, default limits, fresh limiter.
pub fn client_with(apis: &[(&str, &str)], transport: MockTransport) -> ApiClient {
    client_from(config_with(apis), transport)
}

/// Client over an arbitrary config.
pub fn client_from(config: Config, transport: MockTransport) -> ApiClient {
    ApiClient::new(
        Arc::new(config),
        Arc::new(transport),
        Arc::new(RateLimiter::new()),
        LimitsConfig::default(),
        Duration::from_secs(10),
    )
}
