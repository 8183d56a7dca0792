//! Trade Signal Sizing Bot
//!
//! Reads trade signals forwarded from a Telegram channel and suggests a
//! position size from the user's deposit and risk percentage.

mod api;
mod bot;
mod config;
mod db;
mod error;
mod models;
mod signal;
mod trading;

use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::api::{TelegramClient, TELEGRAM_API_BASE};
use crate::bot::{Dispatcher, Messages, Orchestrator};
use crate::config::{BotConfig, Locale};
use crate::signal::{parse_positive, parse_signal};
use crate::trading::size_position;

/// Trade signal position sizing bot CLI.
#[derive(Parser)]
#[command(name = "sizerbot")]
#[command(about = "Suggest position sizes for forwarded trade signals", long_about = None)]
struct Cli {
    /// State store URL (SQLite URL, or `memory:` for a throwaway store)
    #[arg(
        short,
        long,
        env = "SIZER_DATABASE_URL",
        default_value = "sqlite:./signal_sizer.db?mode=rwc"
    )]
    database: String,

    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the Telegram bot
    Run {
        /// Telegram bot token
        #[arg(long, env = "TELEGRAM_BOT_TOKEN", hide_env_values = true)]
        token: String,

        /// Support chat username shown in error messages
        #[arg(long, env = "SIZER_SUPPORT_USERNAME")]
        support: Option<String>,

        /// Display language (ru, en)
        #[arg(long, env = "SIZER_LANGUAGE", default_value = "ru")]
        language: Locale,

        /// Return the chat to idle after each calculation
        #[arg(long)]
        clear_after_calc: bool,

        /// Handle messages of one chat concurrently instead of in order
        #[arg(long)]
        concurrent_chats: bool,

        /// Bot API base URL
        #[arg(long, env = "TELEGRAM_API_URL", default_value = TELEGRAM_API_BASE)]
        api_url: String,

        /// Long-poll timeout in seconds
        #[arg(long, default_value = "120")]
        poll_timeout: u64,
    },

    /// Parse a signal message and print the extracted offer as JSON
    Parse {
        /// File with the message text (stdin if omitted)
        file: Option<PathBuf>,
    },

    /// Size a position for a signal message without running the bot
    Calc {
        /// Deposit amount
        #[arg(short, long)]
        deposit: String,

        /// Risk percentage
        #[arg(short, long)]
        risk: String,

        /// Display language (ru, en)
        #[arg(long, default_value = "ru")]
        language: Locale,

        /// File with the message text (stdin if omitted)
        file: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Setup logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level.to_lowercase()));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Run {
            token,
            support,
            language,
            clear_after_calc,
            concurrent_chats,
            api_url,
            poll_timeout,
        } => {
            let client = Arc::new(TelegramClient::with_base_url(
                api_url,
                &token,
                Duration::from_secs(poll_timeout),
            )?);
            let me = client.get_me().await.context("Failed to authorize bot token")?;

            let store = db::open(&cli.database)
                .await
                .context("Failed to open state store")?;

            let config = BotConfig {
                support_username: support,
                locale: language,
                clear_state_after_calculation: clear_after_calc,
                sequential_chats: !concurrent_chats,
                ..Default::default()
            };

            info!(
                bot_id = me.id,
                username = ?me.username,
                language = ?config.locale,
                clear_after_calc = config.clear_state_after_calculation,
                sequential_chats = config.sequential_chats,
                "Bot is started"
            );

            let orchestrator = Arc::new(Orchestrator::new(store, client.clone(), config));
            let dispatcher = Dispatcher::new(orchestrator);

            bot::run(&client, &dispatcher).await?;
        }

        Commands::Parse { file } => {
            let text = read_message(file.as_ref())?;
            let offer = parse_signal(&text).context("Failed to parse signal")?;
            println!("{}", serde_json::to_string_pretty(&offer)?);
        }

        Commands::Calc {
            deposit,
            risk,
            language,
            file,
        } => {
            let deposit = parse_amount(&deposit, "deposit")?;
            let risk = parse_amount(&risk, "risk")?;

            let text = read_message(file.as_ref())?;
            let offer = parse_signal(&text).context("Failed to parse signal")?;
            let size = size_position(deposit, risk, &offer)?;

            println!("{}", Messages::new(language, None).sizing_result(&offer, &size));
        }
    }

    Ok(())
}

fn read_message(file: Option<&PathBuf>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read stdin")?;
            Ok(text)
        }
    }
}

fn parse_amount(raw: &str, name: &str) -> Result<Decimal> {
    parse_positive(raw)
        .with_context(|| format!("Invalid {}: {:?}, expected a positive number", name, raw))
}
