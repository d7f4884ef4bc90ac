//! Error types for linkrelay

use thiserror::Error;

/// Errors produced by a single fetch attempt
#[derive(Debug, Error)]
pub enum FetchError {
    /// Failed to build HTTP client
    #[error("Failed to create HTTP client")]
    ClientBuildError(#[source] reqwest::Error),

    /// Request did not finish within the configured timeout
    #[error("Request timed out")]
    Timeout,

    /// Failed to connect to server or proxy
    #[error("Failed to connect to server")]
    Connect(#[source] reqwest::Error),

    /// Other transport error
    #[error("Request failed: {0}")]
    Request(String),

    /// Server answered with a non-success status
    #[error("Server responded with HTTP {code}")]
    Status {
        /// HTTP status code
        code: u16,
        /// Short excerpt of the response body, kept for logs
        body: String,
    },

    /// Declared or measured body size is above the limit
    #[error("Response exceeds {limit} bytes")]
    TooLarge {
        /// Size ceiling that was exceeded
        limit: u64,
        /// Content-Length, when the server declared one
        declared: Option<u64>,
    },

    /// Every configured route failed
    #[error("All {attempts} routes failed, last error: {last}")]
    RoutesExhausted {
        /// Number of routes tried
        attempts: usize,
        /// Error from the final route
        last: Box<FetchError>,
    },
}

impl FetchError {
    /// Create an error from a reqwest error
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else if err.is_connect() {
            FetchError::Connect(err)
        } else {
            FetchError::Request(err.to_string())
        }
    }

    /// True when the server was reached and answered with a status code
    pub fn is_status(&self) -> bool {
        matches!(self, FetchError::Status { .. })
    }
}

/// Failure to send a reply or attachment to the chat platform
#[derive(Debug, Error)]
#[error("{0}")]
pub struct DeliveryError(pub String);

/// Everything that can go wrong while handling one inbound message
///
/// The `Display` text of each variant is the reply sent to the user.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Please send a valid direct download link.")]
    InvalidUrl,

    #[error("Invalid filename in URL.")]
    InvalidFilename,

    #[error("This appears to be a pre-signed URL. It may have expired. Please provide a fresh link.")]
    LikelyExpiredLink,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Download failed: HTTP {0}. The server may require specific headers or restrict bot access.")]
    UpstreamStatus(u16),

    #[error("File too large for Telegram (max {}).", limit_label(.limit))]
    PayloadTooLarge { limit: u64 },

    #[error("Telegram error: {0}")]
    Delivery(#[from] DeliveryError),
}

/// Whole megabytes when the limit is a multiple of 1 MB, bytes otherwise
fn limit_label(limit: &u64) -> String {
    let limit = *limit;
    if limit >= 1_000_000 && limit % 1_000_000 == 0 {
        format!("{} MB", limit / 1_000_000)
    } else {
        format!("{limit} bytes")
    }
}

impl From<FetchError> for RelayError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::Status { code, .. } => RelayError::UpstreamStatus(code),
            FetchError::TooLarge { limit, .. } => RelayError::PayloadTooLarge { limit },
            FetchError::Timeout => RelayError::Network("request timed out".to_string()),
            FetchError::Connect(e) => RelayError::Network(e.to_string()),
            other => RelayError::Network(other.to_string()),
        }
    }
}

/// Errors raised while loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid proxy URL: {0}")]
    InvalidProxy(String),

    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    #[error("Timeout must be greater than zero")]
    ZeroTimeout,

    #[error("Size limit must be greater than zero")]
    ZeroLimit,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            RelayError::InvalidUrl.to_string(),
            "Please send a valid direct download link."
        );
        assert_eq!(
            RelayError::InvalidFilename.to_string(),
            "Invalid filename in URL."
        );
        assert_eq!(
            RelayError::UpstreamStatus(403).to_string(),
            "Download failed: HTTP 403. The server may require specific headers or restrict bot access."
        );
        assert_eq!(
            RelayError::PayloadTooLarge { limit: 50_000_000 }.to_string(),
            "File too large for Telegram (max 50 MB)."
        );
        assert_eq!(
            RelayError::PayloadTooLarge { limit: 1024 }.to_string(),
            "File too large for Telegram (max 1024 bytes)."
        );
        assert_eq!(
            RelayError::PayloadTooLarge { limit: 2_500_000 }.to_string(),
            "File too large for Telegram (max 2500000 bytes)."
        );
        assert_eq!(
            RelayError::Delivery(DeliveryError("Bad Request".into())).to_string(),
            "Telegram error: Bad Request"
        );
    }

    #[test]
    fn test_fetch_error_mapping() {
        let status = FetchError::Status {
            code: 404,
            body: "not found".into(),
        };
        assert!(status.is_status());
        assert!(matches!(
            RelayError::from(status),
            RelayError::UpstreamStatus(404)
        ));

        let too_large = FetchError::TooLarge {
            limit: 10,
            declared: Some(11),
        };
        assert!(matches!(
            RelayError::from(too_large),
            RelayError::PayloadTooLarge { limit: 10 }
        ));

        match RelayError::from(FetchError::Timeout) {
            RelayError::Network(msg) => assert_eq!(msg, "request timed out"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_exhausted_message_names_last_error() {
        let err = FetchError::RoutesExhausted {
            attempts: 3,
            last: Box::new(FetchError::Status {
                code: 502,
                body: String::new(),
            }),
        };
        assert_eq!(
            err.to_string(),
            "All 3 routes failed, last error: Server responded with HTTP 502"
        );
        assert_eq!(
            RelayError::from(err).to_string(),
            "Network error: All 3 routes failed, last error: Server responded with HTTP 502"
        );
    }
}
