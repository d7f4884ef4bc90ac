//! Outbound side of the chat platform
//!
//! The relay only needs two calls: send a line of text and send a named
//! file. Platform clients implement [`ChatAdapter`]; the relay never sees
//! the platform SDK.

use crate::error::DeliveryError;
use crate::types::ConversationId;
use async_trait::async_trait;
use bytes::Bytes;

/// Sends replies back to the conversation a message came from
#[async_trait]
pub trait ChatAdapter: Send + Sync {
    /// Send a plain text message
    async fn send_text(&self, conversation: ConversationId, text: &str)
        -> Result<(), DeliveryError>;

    /// Send `body` as a document attachment named `filename`
    async fn send_file(
        &self,
        conversation: ConversationId,
        filename: &str,
        body: Bytes,
    ) -> Result<(), DeliveryError>;
}
