//! Example: run the relay without Telegram
//!
//! Run with: cargo run -p linkrelay --example relay_local -- <URL>...
//!
//! Each argument is handled as a message from its own conversation.
//! Replies are printed; attachments are written to
//! `./relay-out/<conversation>/<filename>` so concurrent requests for
//! equally named files never collide.

use async_trait::async_trait;
use bytes::Bytes;
use linkrelay::{ChatAdapter, ConversationId, DeliveryError, Relay};
use std::path::PathBuf;
use std::sync::Arc;

/// Chat adapter that prints replies and saves attachments to disk
struct LocalChat {
    out_dir: PathBuf,
}

#[async_trait]
impl ChatAdapter for LocalChat {
    async fn send_text(
        &self,
        conversation: ConversationId,
        text: &str,
    ) -> Result<(), DeliveryError> {
        println!("[{}] {}", conversation, text);
        Ok(())
    }

    async fn send_file(
        &self,
        conversation: ConversationId,
        filename: &str,
        body: Bytes,
    ) -> Result<(), DeliveryError> {
        let dir = self.out_dir.join(conversation.to_string());
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| DeliveryError(e.to_string()))?;
        let path = dir.join(filename);
        tokio::fs::write(&path, &body)
            .await
            .map_err(|e| DeliveryError(e.to_string()))?;
        println!("[{}] saved {} ({} bytes)", conversation, path.display(), body.len());
        Ok(())
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "linkrelay=info".into()),
        )
        .init();

    let urls: Vec<String> = std::env::args().skip(1).collect();
    if urls.is_empty() {
        eprintln!("Usage: relay_local <URL>...");
        std::process::exit(1);
    }

    let chat = Arc::new(LocalChat {
        out_dir: PathBuf::from("relay-out"),
    });
    let relay = match Relay::builder().build(chat) {
        Ok(relay) => Arc::new(relay),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let tasks: Vec<_> = urls
        .into_iter()
        .enumerate()
        .map(|(i, url)| {
            let relay = relay.clone();
            tokio::spawn(async move { relay.handle(ConversationId(i as i64 + 1), &url).await })
        })
        .collect();

    let mut delivered = 0;
    let total = tasks.len();
    for task in tasks {
        if let Ok(outcome) = task.await {
            if outcome.is_delivered() {
                delivered += 1;
            }
        }
    }

    println!("\n{}/{} delivered", delivered, total);
}
