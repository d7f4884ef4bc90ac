//! Linkrelay - download a linked file and hand it back to a chat
//!
//! A user sends a URL; the relay validates it, downloads the resource and
//! sends the bytes back as a file attachment. Every failure becomes a
//! single text reply.
//!
//! ## Pieces
//!
//! - [`Target`] - URL validation and filename sanitizing
//! - [`Fetcher`] - one download attempt over one [`Route`];
//!   [`HttpFetcher`] is the reqwest implementation
//! - [`ChatAdapter`] - outbound calls to the chat platform
//! - [`Relay`] - the orchestrator tying them together, with ordered proxy
//!   fallback
//! - [`RelayConfig`] - header set, proxies, timeouts and limits as data

mod chat;
mod command;
mod config;
mod error;
pub mod fetchers;
mod handler;
mod target;
mod types;

pub use chat::ChatAdapter;
pub use command::Command;
pub use config::{FetchOptions, RelayConfig};
pub use error::{ConfigError, DeliveryError, FetchError, RelayError};
pub use fetchers::{Fetcher, HttpFetcher};
pub use handler::{Relay, RelayBuilder};
pub use target::{sanitize_filename, Target};
pub use types::{ConversationId, FetchedFile, Outcome, Route};

/// Default User-Agent string, a desktop browser
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36";

/// Default overall timeout per download attempt, in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default size ceiling, matching the Telegram bot upload limit
pub const DEFAULT_MAX_BYTES: u64 = 50_000_000;

/// Acknowledgement sent before a download starts
pub const ACK_TEXT: &str = "Downloading file...";

/// Reply to `/start`, `/help` and unknown commands
pub const USAGE_TEXT: &str = r#"Send me a direct download link and I will send the file back.

Usage:
- paste an http:// or https:// link
- or use /get <link>

Files larger than 50 MB cannot be sent."#;
