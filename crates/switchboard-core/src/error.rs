use thiserror::Error;

/// Top-level error type for Switchboard.
///
/// `Display` output may contain transport or parser details and is meant for
/// logs only. Use [`SwitchboardError::user_message`] for anything shown to a user.
#[derive(Debug, Error)]
pub enum SwitchboardError {
    /// Provider missing from configuration or disabled.
    #[error("config error: {0}")]
    Config(String),

    /// Fixed-window quota exhausted for a provider.
    #[error("rate limit exceeded for {provider}")]
    RateLimited { provider: String },

    /// Provider answered with a non-2xx status.
    #[error("HTTP {status}: {status_text}")]
    Http { status: u16, status_text: String },

    /// Connection failure or request timeout.
    #[error("network error: {0}")]
    Network(String),

    /// The user message lacked a required parameter.
    #[error("extraction error: {0}")]
    Extraction(String),

    /// Provider answered, but not in the expected shape.
    #[error("unexpected response: {0}")]
    Normalization(String),

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SwitchboardError {
    /// Build the "<label> is not enabled" config error.
    pub fn not_enabled(label: &str) -> Self {
        Self::Config(format!("{label} is not enabled"))
    }

    /// A short phrase safe to show to an end user.
    ///
    /// Never includes transport errors, response bodies, or credentials.
    pub fn user_message(&self) -> String {
        match self {
            // Config messages are built from static provider labels only.
            Self::Config(msg) => msg.clone(),
            Self::RateLimited { .. } => "rate limit exceeded".to_string(),
            Self::Http { .. } | Self::Network(_) => {
                "the service is unavailable right now".to_string()
            }
            Self::Extraction(_) => "a required detail is missing".to_string(),
            Self::Normalization(_) | Self::Serialization(_) => "data not available".to_string(),
            Self::Io(_) => "an internal error occurred".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_display() {
        let err = SwitchboardError::Http {
            status: 503,
            status_text: "Service Unavailable".into(),
        };
        assert_eq!(format!("{err}"), "HTTP 503: Service Unavailable");
    }

    #[test]
    fn test_user_message_hides_details() {
        let err = SwitchboardError::Network("tcp connect error: 10.0.0.1:443 refused".into());
        let msg = err.user_message();
        assert!(!msg.contains("10.0.0.1"), "leaked address: {msg}");
        assert!(!msg.contains("tcp"), "leaked transport detail: {msg}");
    }

    #[test]
    fn test_not_enabled_message() {
        let err = SwitchboardError::not_enabled("Weather");
        assert_eq!(err.user_message(), "Weather is not enabled");
    }

    #[test]
    fn test_rate_limited_message() {
        let err = SwitchboardError::RateLimited {
            provider: "weather".into(),
        };
        assert_eq!(err.user_message(), "rate limit exceeded");
        assert_eq!(format!("{err}"), "rate limit exceeded for weather");
    }

    #[test]
    fn test_io_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err = SwitchboardError::from(io_err);
        let display = format!("{err}");
        assert!(display.contains("io error"), "got: {display}");
        assert!(!err.user_message().contains("file missing"));
    }
}
