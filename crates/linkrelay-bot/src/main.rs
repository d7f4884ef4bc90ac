//! Linkrelay bot - Telegram front end for linkrelay

mod health;
mod telegram;

use clap::Parser;
use linkrelay::{Relay, RelayConfig};
use std::path::PathBuf;
use std::sync::Arc;
use teloxide::Bot;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::telegram::TelegramChat;

/// Linkrelay - send a link, get the file back
#[derive(Parser, Debug)]
#[command(name = "linkrelay")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Telegram bot token
    #[arg(long, env = "TELEGRAM_BOT_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Health check server port
    #[arg(long, env = "PORT", default_value_t = 8080)]
    port: u16,

    /// Do not start the health check server
    #[arg(long)]
    no_health: bool,

    /// JSON file with headers, proxies and limits
    #[arg(long, env = "LINKRELAY_CONFIG")]
    config: Option<PathBuf>,

    /// Proxy URLs tried in order (overrides the config file)
    #[arg(long = "proxy", env = "LINKRELAY_PROXIES", value_delimiter = ',')]
    proxies: Vec<String>,

    /// Overall download timeout in seconds (overrides the config file)
    #[arg(long, env = "LINKRELAY_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,
}

impl Args {
    /// The bot token, if one was given and is not blank
    fn token(&self) -> Option<&str> {
        self.token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
    }

    /// Load the config file, if any, and apply flag overrides
    fn relay_config(&self) -> Result<RelayConfig, linkrelay::ConfigError> {
        let mut config = match &self.config {
            Some(path) => {
                info!("Loading config from file: {}", path.display());
                RelayConfig::from_file(path)?
            }
            None => RelayConfig::default(),
        };

        if !self.proxies.is_empty() {
            config.proxies = self.proxies.clone();
        }
        if let Some(secs) = self.timeout_secs {
            config.timeout_secs = secs;
        }

        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "linkrelay=info,linkrelay_bot=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let Some(token) = args.token() else {
        error!("TELEGRAM_BOT_TOKEN is not set");
        std::process::exit(1);
    };

    let config = match args.relay_config() {
        Ok(config) => config,
        Err(e) => {
            error!(error = ?e, "Invalid configuration");
            std::process::exit(1);
        }
    };
    info!(
        proxies = config.proxies.len(),
        timeout_secs = config.timeout_secs,
        max_bytes = config.max_bytes,
        "Configuration loaded"
    );

    let bot = Bot::new(token);
    let chat = Arc::new(TelegramChat::new(bot.clone()));

    let relay = match Relay::builder().config(config).build(chat) {
        Ok(relay) => Arc::new(relay),
        Err(e) => {
            error!(error = ?e, "Failed to build relay");
            std::process::exit(1);
        }
    };

    if !args.no_health {
        let port = args.port;
        tokio::spawn(async move {
            if let Err(e) = health::start_health_server(port).await {
                error!("Health check server error: {}", e);
            }
        });
    }

    telegram::dispatch(bot, relay).await;
    info!("Dispatcher stopped");
}
