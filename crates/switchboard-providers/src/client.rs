//! Uniform, rate-limited access to configured provider endpoints.

use std::sync::Arc;
use std::time::Duration;

use switchboard_core::{
    config::{LimitsConfig, ProviderConfig},
    envelope::RawResponse,
    error::SwitchboardError,
    traits::{ConfigSource, HttpRequest, HttpResponse, HttpTransport},
};
use tracing::{debug, warn};

use crate::{http::redact_query, label, rate_limit::RateLimiter};

/// Failure text for a selected chat model that is missing or disabled.
pub const MODEL_UNAVAILABLE: &str =
    "Selected AI model is not available, please choose a different model";

/// How to decode a response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expect {
    /// JSON when the content type says so, text otherwise.
    Auto,
    /// Raw bytes (audio, documents).
    Binary,
}

/// Provider client shared by every capability module.
#[derive(Clone)]
pub struct ApiClient {
    config: Arc<dyn ConfigSource>,
    transport: Arc<dyn HttpTransport>,
    limiter: Arc<RateLimiter>,
    limits: LimitsConfig,
    timeout: Duration,
}

impl ApiClient {
    pub fn new(
        config: Arc<dyn ConfigSource>,
        transport: Arc<dyn HttpTransport>,
        limiter: Arc<RateLimiter>,
        limits: LimitsConfig,
        timeout: Duration,
    ) -> Self {
        Self {
            config,
            transport,
            limiter,
            limits,
            timeout,
        }
    }

    /// Replace the default rate limit.
    pub fn with_limits(mut self, limits: LimitsConfig) -> Self {
        self.limits = limits;
        self
    }

    pub fn config(&self) -> &dyn ConfigSource {
        self.config.as_ref()
    }

    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Whether `name` is configured and enabled.
    pub fn is_enabled(&self, name: &str) -> bool {
        self.config.get(name).is_some_and(|api| api.enabled)
    }

    /// Resolve the provider config and count one attempt against its quota.
    ///
    /// No network traffic happens here. A missing or disabled provider does
    /// not consume quota.
    pub fn acquire(&self, name: &str) -> Result<ProviderConfig, SwitchboardError> {
        let api = self
            .config
            .get(name)
            .filter(|api| api.enabled)
            .ok_or_else(|| SwitchboardError::not_enabled(label(name)))?;
        self.admit(name, api)
    }

    /// [`acquire`](Self::acquire) for a user-selected `[ai_models.<model>]`
    /// entry. Each model has its own quota under `ai_models.<model>`.
    pub fn acquire_model(&self, model: &str) -> Result<ProviderConfig, SwitchboardError> {
        let api = self
            .config
            .chat_model(model)
            .filter(|api| api.enabled)
            .ok_or_else(|| SwitchboardError::Config(MODEL_UNAVAILABLE.to_string()))?;
        self.admit(&format!("ai_models.{model}"), api)
    }

    fn admit(&self, key: &str, api: ProviderConfig) -> Result<ProviderConfig, SwitchboardError> {
        let (max_requests, window) = api.limit(&self.limits);
        if !self.limiter.check(key, max_requests, window) {
            warn!("{key}: rate limit of {max_requests} per {window:?} reached");
            return Err(SwitchboardError::RateLimited {
                provider: key.to_string(),
            });
        }
        Ok(api)
    }

    /// Issue a request that has already been counted by [`acquire`](Self::acquire).
    pub async fn fetch(
        &self,
        request: HttpRequest,
        expect: Expect,
    ) -> Result<RawResponse, SwitchboardError> {
        let url = redact_query(&request.url).to_string();
        let resp = self.transport.send(request).await.inspect_err(|e| {
            warn!("request to {url} failed: {e}");
        })?;
        if !resp.is_success() {
            warn!("{url} returned HTTP {} {}", resp.status, resp.status_text);
            return Err(SwitchboardError::Http {
                status: resp.status,
                status_text: resp.status_text,
            });
        }
        decode(resp, expect)
    }

    /// `acquire` + GET `endpoint{path}?params`.
    pub async fn call(
        &self,
        name: &str,
        path: &str,
        params: &[(&str, &str)],
        expect: Expect,
    ) -> Result<RawResponse, SwitchboardError> {
        let api = self.acquire(name)?;
        let url = build_url(&api.endpoint, path, params);
        debug!("{name}: GET {}", redact_query(&url));
        self.fetch(HttpRequest::get(url, self.timeout), expect).await
    }
}

/// Join `endpoint` and `path`, then append URL-encoded query parameters.
pub fn build_url(endpoint: &str, path: &str, params: &[(&str, &str)]) -> String {
    let mut url = if path.is_empty() {
        endpoint.to_string()
    } else {
        format!(
            "{}/{}",
            endpoint.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    };
    let query: Vec<String> = params
        .iter()
        .map(|(k, v)| format!("{k}={}", urlencoding::encode(v)))
        .collect();
    if !query.is_empty() {
        url.push(if url.contains('?') { '&' } else { '?' });
        url.push_str(&query.join("&"));
    }
    url
}

/// Decode a 2xx response body by declared content type.
fn decode(resp: HttpResponse, expect: Expect) -> Result<RawResponse, SwitchboardError> {
    if expect == Expect::Binary {
        return Ok(RawResponse::Binary(resp.body));
    }
    let is_json = resp
        .content_type
        .as_deref()
        .is_some_and(|ct| ct.to_ascii_lowercase().contains("application/json"));
    if is_json {
        let value = serde_json::from_slice(&resp.body)
            .map_err(|e| SwitchboardError::Normalization(format!("invalid JSON body: {e}")))?;
        Ok(RawResponse::Json(value))
    } else {
        Ok(RawResponse::Text(
            String::from_utf8_lossy(&resp.body).into_owned(),
        ))
    }
}
