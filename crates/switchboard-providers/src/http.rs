//! reqwest-backed [`HttpTransport`].

use async_trait::async_trait;
use switchboard_core::{
    error::SwitchboardError,
    traits::{HttpMethod, HttpRequest, HttpResponse, HttpTransport},
};
use tracing::debug;

/// Production transport sharing one connection pool.
#[derive(Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, SwitchboardError> {
        let HttpRequest {
            method,
            url,
            bearer,
            json,
            timeout,
        } = request;
        debug!("http: {method:?} {}", redact_query(&url));

        let mut builder = match method {
            HttpMethod::Get => self.client.get(&url),
            HttpMethod::Post => self.client.post(&url),
            HttpMethod::Head => self.client.head(&url),
        }
        .timeout(timeout);
        if let Some(token) = bearer {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = json {
            builder = builder.json(&body);
        }

        let resp = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                SwitchboardError::Network(format!("request timed out after {timeout:?}"))
            } else {
                SwitchboardError::Network(format!("request failed: {e}"))
            }
        })?;

        let status = resp.status();
        let content_type = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = resp
            .bytes()
            .await
            .map_err(|e| SwitchboardError::Network(format!("failed to read body: {e}")))?;

        Ok(HttpResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            content_type,
            body: body.to_vec(),
        })
    }
}

/// Drop the query string so user text and keys stay out of debug logs.
pub(crate) fn redact_query(url: &str) -> &str {
    url.split('?').next().unwrap_or(url)
}
