//! Phone number lookup and handset specifications.

use serde_json::Value;
use switchboard_core::{
    envelope::{ProviderResult, RawResponse},
    error::SwitchboardError,
};

use crate::{
    client::{ApiClient, Expect},
    names::{PHONE_INFO, TRUECALLER},
    normalize::{normalize, unexpected, ResponseParser},
};

/// Passes the provider's record through as `data`; the dispatcher renders it.
pub struct RecordParser {
    action: &'static str,
    summary: String,
}

impl RecordParser {
    pub fn lookup(number: &str) -> Self {
        Self {
            action: "Phone lookup",
            summary: format!("Phone lookup completed for {number}"),
        }
    }

    pub fn info(model: &str) -> Self {
        Self {
            action: "Phone info lookup",
            summary: format!("Phone specifications found for {model}"),
        }
    }
}

impl ResponseParser for RecordParser {
    fn action(&self) -> &str {
        self.action
    }

    fn parse(&self, raw: RawResponse) -> Result<ProviderResult, SwitchboardError> {
        let data = match raw {
            RawResponse::Json(Value::Null) => return Err(unexpected("empty record")),
            RawResponse::Json(v) => v,
            RawResponse::Text(t) if !t.trim().is_empty() => Value::String(t.trim().to_string()),
            _ => return Err(unexpected("empty record")),
        };
        Ok(ProviderResult::ok(self.summary.clone(), Some(data)))
    }
}

/// Caller-id lookup for `number`.
pub async fn lookup(client: &ApiClient, number: &str) -> ProviderResult {
    let outcome = client
        .call(TRUECALLER, "", &[("q", number)], Expect::Auto)
        .await;
    normalize(TRUECALLER, outcome, &RecordParser::lookup(number))
}

/// Specifications for a handset `model`.
pub async fn info(client: &ApiClient, model: &str) -> ProviderResult {
    let outcome = client
        .call(PHONE_INFO, "", &[("query", model)], Expect::Auto)
        .await;
    normalize(PHONE_INFO, outcome, &RecordParser::info(model))
}
