//! Request handling: validate, fetch, reply
//!
//! [`Relay`] turns one inbound message into exactly one user-visible
//! outcome. Nothing escapes [`Relay::handle`]: every failure is logged and
//! converted into a reply.

use crate::chat::ChatAdapter;
use crate::command::Command;
use crate::config::{FetchOptions, RelayConfig};
use crate::error::{ConfigError, FetchError, RelayError};
use crate::fetchers::{Fetcher, HttpFetcher};
use crate::target::Target;
use crate::types::{ConversationId, FetchedFile, Outcome, Route};
use crate::{ACK_TEXT, USAGE_TEXT};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Builder for configuring a [`Relay`]
pub struct RelayBuilder {
    fetcher: Arc<dyn Fetcher>,
    config: RelayConfig,
    usage_text: String,
}

impl RelayBuilder {
    /// Create a builder with the HTTP fetcher and default configuration
    pub fn new() -> Self {
        Self {
            fetcher: Arc::new(HttpFetcher::new()),
            config: RelayConfig::default(),
            usage_text: USAGE_TEXT.to_string(),
        }
    }

    /// Replace the fetcher
    pub fn fetcher(mut self, fetcher: Arc<dyn Fetcher>) -> Self {
        self.fetcher = fetcher;
        self
    }

    /// Use the given configuration
    pub fn config(mut self, config: RelayConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the text sent for `/start`, `/help` and unknown commands
    pub fn usage_text(mut self, text: impl Into<String>) -> Self {
        self.usage_text = text.into();
        self
    }

    /// Build the relay, replying through `chat`
    pub fn build(self, chat: Arc<dyn ChatAdapter>) -> Result<Relay, ConfigError> {
        self.config.validate()?;
        Ok(Relay {
            fetcher: self.fetcher,
            chat,
            options: self.config.fetch_options()?,
            routes: self.config.routes(),
            expiry_params: self.config.expiry_params,
            usage_text: self.usage_text,
        })
    }
}

impl Default for RelayBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Configured request handler
///
/// Immutable after construction; share it across tasks behind an `Arc`.
pub struct Relay {
    fetcher: Arc<dyn Fetcher>,
    chat: Arc<dyn ChatAdapter>,
    options: FetchOptions,
    routes: Vec<Route>,
    expiry_params: Vec<String>,
    usage_text: String,
}

impl Relay {
    /// Create a new relay builder
    pub fn builder() -> RelayBuilder {
        RelayBuilder::new()
    }

    /// Routes in the order they are tried
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Handle the text of one inbound message
    pub async fn handle(&self, conversation: ConversationId, text: &str) -> Outcome {
        let raw = match Command::parse(text) {
            Command::Fetch(raw) => raw,
            Command::MissingArgument => {
                return self.fail(conversation, "", RelayError::InvalidUrl).await
            }
            Command::Start | Command::Help | Command::Unknown(_) => {
                self.reply(conversation, &self.usage_text).await;
                return Outcome::Usage;
            }
        };

        info!(%conversation, url = %raw, "Processing URL");

        match self.relay(conversation, &raw).await {
            Ok((filename, size)) => {
                info!(%conversation, url = %raw, %filename, size, "File delivered");
                Outcome::Delivered { filename, size }
            }
            Err(err) => self.fail(conversation, &raw, err).await,
        }
    }

    async fn relay(
        &self,
        conversation: ConversationId,
        raw: &str,
    ) -> Result<(String, u64), RelayError> {
        let target = Target::parse(raw)?;
        if target.has_expiry_marker(&self.expiry_params) {
            return Err(RelayError::LikelyExpiredLink);
        }

        if let Err(e) = self.chat.send_text(conversation, ACK_TEXT).await {
            warn!(%conversation, url = raw, error = %e, "Failed to send acknowledgement");
        }

        let file = self.fetch_via_routes(&target).await?;
        let size = file.size();
        if size > self.options.max_bytes {
            return Err(RelayError::PayloadTooLarge {
                limit: self.options.max_bytes,
            });
        }

        self.chat
            .send_file(conversation, &target.filename, file.body)
            .await?;
        Ok((target.filename, size))
    }

    /// Try each route in order until one succeeds
    ///
    /// A single route reports its own error. With several routes the last
    /// error is wrapped in [`FetchError::RoutesExhausted`]. An oversized
    /// body stops the iteration since another route would return the same
    /// file.
    async fn fetch_via_routes(&self, target: &Target) -> Result<FetchedFile, FetchError> {
        let mut last = None;

        let fetcher = self.fetcher.name();

        for route in &self.routes {
            match self.fetcher.fetch(&target.url, route, &self.options).await {
                Ok(file) => {
                    info!(
                        url = %target.url, final_url = %file.final_url, %route, fetcher,
                        "Fetched"
                    );
                    return Ok(file);
                }
                Err(err @ FetchError::TooLarge { .. }) => return Err(err),
                Err(err) => {
                    match &err {
                        FetchError::Status { code, body } => warn!(
                            url = %target.url, %route, fetcher, status = code, body = %body,
                            "Download failed"
                        ),
                        other => warn!(
                            url = %target.url, %route, fetcher, error = %other,
                            "Download failed"
                        ),
                    }
                    last = Some(err);
                }
            }
        }

        let last = last.ok_or_else(|| FetchError::Request("no route configured".to_string()))?;
        if self.routes.len() == 1 {
            Err(last)
        } else {
            Err(FetchError::RoutesExhausted {
                attempts: self.routes.len(),
                last: Box::new(last),
            })
        }
    }

    async fn fail(&self, conversation: ConversationId, raw: &str, err: RelayError) -> Outcome {
        error!(%conversation, url = raw, error = ?err, "Request failed");
        self.reply(conversation, &err.to_string()).await;
        Outcome::Failed(err)
    }

    async fn reply(&self, conversation: ConversationId, text: &str) {
        if let Err(e) = self.chat.send_text(conversation, text).await {
            error!(%conversation, error = %e, "Failed to send reply");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DeliveryError;
    use async_trait::async_trait;
    use bytes::Bytes;
    use std::sync::Mutex;
    use url::Url;

    #[derive(Default)]
    struct NullChat {
        texts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ChatAdapter for NullChat {
        async fn send_text(&self, _: ConversationId, text: &str) -> Result<(), DeliveryError> {
            self.texts.lock().unwrap().push(text.to_string());
            Ok(())
        }

        async fn send_file(&self, _: ConversationId, _: &str, _: Bytes) -> Result<(), DeliveryError> {
            Ok(())
        }
    }

    struct PanicFetcher;

    #[async_trait]
    impl Fetcher for PanicFetcher {
        fn name(&self) -> &'static str {
            "panic"
        }

        async fn fetch(&self, _: &Url, _: &Route, _: &FetchOptions) -> Result<FetchedFile, FetchError> {
            panic!("no fetch expected");
        }
    }

    fn relay(chat: Arc<NullChat>) -> Relay {
        Relay::builder()
            .fetcher(Arc::new(PanicFetcher))
            .build(chat)
            .unwrap()
    }

    #[tokio::test]
    async fn test_start_sends_usage() {
        let chat = Arc::new(NullChat::default());
        let outcome = relay(chat.clone()).handle(ConversationId(1), "/start").await;
        assert!(matches!(outcome, Outcome::Usage));
        assert_eq!(*chat.texts.lock().unwrap(), vec![USAGE_TEXT.to_string()]);
    }

    #[tokio::test]
    async fn test_custom_usage_text() {
        let chat = Arc::new(NullChat::default());
        let relay = Relay::builder()
            .fetcher(Arc::new(PanicFetcher))
            .usage_text("hi")
            .build(chat.clone())
            .unwrap();
        relay.handle(ConversationId(1), "/unknown").await;
        assert_eq!(*chat.texts.lock().unwrap(), vec!["hi".to_string()]);
    }

    #[tokio::test]
    async fn test_get_without_argument() {
        let chat = Arc::new(NullChat::default());
        let outcome = relay(chat.clone()).handle(ConversationId(1), "/get").await;
        assert!(matches!(outcome.error(), Some(RelayError::InvalidUrl)));
    }

    #[test]
    fn test_builder_rejects_invalid_config() {
        let config = RelayConfig {
            timeout_secs: 0,
            ..Default::default()
        };
        let result = Relay::builder()
            .config(config)
            .build(Arc::new(NullChat::default()));
        assert!(matches!(result, Err(ConfigError::ZeroTimeout)));
    }

    #[test]
    fn test_builder_routes() {
        let config = RelayConfig {
            proxies: vec!["http://a:1".into(), "http://b:2".into()],
            ..Default::default()
        };
        let relay = Relay::builder()
            .config(config)
            .build(Arc::new(NullChat::default()))
            .unwrap();
        assert_eq!(
            relay.routes(),
            &[Route::Proxy("http://a:1".into()), Route::Proxy("http://b:2".into())]
        );
    }
}
