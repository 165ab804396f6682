//! Reachability check for every enabled provider.

use std::fmt;
use std::time::Duration;

use switchboard_core::traits::{ConfigSource, HttpRequest, HttpTransport};
use tracing::warn;

const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Outcome of one HEAD request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Health {
    /// 2xx answer.
    Online,
    /// Reachable, but answered with an error status.
    Issues,
    /// Connection failed or timed out.
    Offline,
}

impl fmt::Display for Health {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Online => "Online",
            Self::Issues => "Issues",
            Self::Offline => "Offline",
        })
    }
}

/// Health of one provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointStatus {
    pub name: String,
    pub endpoint: String,
    pub description: String,
    pub health: Health,
}

/// Probe every enabled provider with a HEAD request, in name order.
pub async fn check_all(
    config: &dyn ConfigSource,
    transport: &dyn HttpTransport,
) -> Vec<EndpointStatus> {
    let mut statuses = Vec::new();
    for (name, api) in config.enabled_providers() {
        let health = match transport
            .send(HttpRequest::head(api.endpoint.clone(), PROBE_TIMEOUT))
            .await
        {
            Ok(resp) if resp.is_success() => Health::Online,
            Ok(resp) => {
                warn!("status: {name} answered HTTP {}", resp.status);
                Health::Issues
            }
            Err(e) => {
                warn!("status: {name} unreachable: {e}");
                Health::Offline
            }
        };
        statuses.push(EndpointStatus {
            name,
            endpoint: api.endpoint,
            description: api.description,
            health,
        });
    }
    statuses
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{config_with, MockTransport};
    use switchboard_core::traits::HttpMethod;

    #[tokio::test]
    async fn test_check_all_classifies_health() {
        let config = config_with(&[
            ("weather", "https://up.example"),
            ("translator", "https://broken.example"),
            ("tts", "https://down.example"),
        ]);
        let transport = MockTransport::new()
            .text("https://up.example", "")
            .status("https://broken.example", 500, "Internal Server Error")
            .fail("https://down.example", "connection refused");

        let statuses = check_all(&config, &transport).await;
        let health: Vec<(&str, Health)> = statuses
            .iter()
            .map(|s| (s.name.as_str(), s.health))
            .collect();
        assert_eq!(
            health,
            vec![
                ("translator", Health::Issues),
                ("tts", Health::Offline),
                ("weather", Health::Online),
            ]
        );
        assert!(transport.sent().iter().all(|r| r.method == HttpMethod::Head));
    }

    #[tokio::test]
    async fn test_check_all_skips_disabled() {
        let mut config = config_with(&[("weather", "https://up.example")]);
        if let Some(api) = config.apis.get_mut("weather") {
            api.enabled = false;
        }
        let transport = MockTransport::new();
        assert!(check_all(&config, &transport).await.is_empty());
        assert!(transport.requests().is_empty());
    }
}
