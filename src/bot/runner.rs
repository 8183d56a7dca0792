//! Update polling loop: pulls updates from Telegram and feeds the dispatcher.

use std::time::Duration;

use anyhow::Result;
use tracing::{debug, info, warn};

use super::Dispatcher;
use crate::api::TelegramClient;

/// Pause after a failed poll so an outage does not turn into a busy loop.
const POLL_ERROR_BACKOFF: Duration = Duration::from_secs(3);

/// Poll until Ctrl+C.
pub async fn run(client: &TelegramClient, dispatcher: &Dispatcher) -> Result<()> {
    let mut offset = 0i64;
    info!("Polling for updates");

    loop {
        let updates = tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received");
                break;
            }
            result = client.get_updates(offset) => result,
        };

        let updates = match updates {
            Ok(updates) => updates,
            Err(e) => {
                warn!(error = %e, "Failed to fetch updates");
                tokio::time::sleep(POLL_ERROR_BACKOFF).await;
                continue;
            }
        };

        for update in updates {
            offset = offset.max(update.update_id + 1);
            let update_id = update.update_id;

            match update.into_incoming() {
                Some(message) => dispatcher.dispatch(message).await,
                None => debug!(update_id, "Skipping update without a user message"),
            }
        }
    }

    info!(active_chats = dispatcher.active_chats().await, "Stopped polling");
    Ok(())
}
