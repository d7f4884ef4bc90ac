//! Core types for linkrelay

use crate::error::RelayError;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of the conversation a message came from and replies go to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConversationId(pub i64);

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One way of reaching the target server
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Connect to the server directly
    Direct,
    /// Tunnel the request through the given proxy URL
    Proxy(String),
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Direct => write!(f, "direct"),
            Route::Proxy(url) => write!(f, "proxy {}", url),
        }
    }
}

/// Body and metadata of a successful download
#[derive(Debug, Clone, Default)]
pub struct FetchedFile {
    /// The requested URL
    pub url: String,

    /// URL after following redirects
    pub final_url: String,

    /// HTTP status code
    pub status_code: u16,

    /// Content-Type header value
    pub content_type: Option<String>,

    /// Full response body
    pub body: Bytes,
}

impl FetchedFile {
    /// Body size in bytes
    pub fn size(&self) -> u64 {
        self.body.len() as u64
    }
}

/// Result of handling one inbound message
#[derive(Debug)]
pub enum Outcome {
    /// Usage text was sent
    Usage,
    /// The file was delivered as an attachment
    Delivered { filename: String, size: u64 },
    /// An error reply was sent
    Failed(RelayError),
}

impl Outcome {
    /// True when a file attachment was sent
    pub fn is_delivered(&self) -> bool {
        matches!(self, Outcome::Delivered { .. })
    }

    /// The error behind a failed outcome
    pub fn error(&self) -> Option<&RelayError> {
        match self {
            Outcome::Failed(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_display() {
        assert_eq!(Route::Direct.to_string(), "direct");
        assert_eq!(
            Route::Proxy("http://10.0.0.1:3128".into()).to_string(),
            "proxy http://10.0.0.1:3128"
        );
    }

    #[test]
    fn test_outcome_helpers() {
        let delivered = Outcome::Delivered {
            filename: "a.pdf".into(),
            size: 3,
        };
        assert!(delivered.is_delivered());
        assert!(delivered.error().is_none());

        let failed = Outcome::Failed(RelayError::InvalidUrl);
        assert!(!failed.is_delivered());
        assert!(matches!(failed.error(), Some(RelayError::InvalidUrl)));
    }

    #[test]
    fn test_fetched_file_size() {
        let file = FetchedFile {
            body: Bytes::from_static(b"hello"),
            ..Default::default()
        };
        assert_eq!(file.size(), 5);
    }
}
