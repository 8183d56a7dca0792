//! Conversation orchestrator: routes each message to one handler and drives
//! the per-chat state machine.
//!
//! ```text
//!            /start (risk unset), /newriskpercent
//!   Idle ─────────────────────────────────────────► AwaitingRiskPercentage
//!    ▲  ◄──────────────── valid percentage ─────────────────┘
//!    │
//!    └── any state ── signal message ──► AwaitingDeposit ── valid deposit ──► sizing reply
//! ```
//!
//! Commands win over signals, signals win over the stored state.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, info, info_span, warn, Instrument};

use super::Messages;
use crate::api::Gateway;
use crate::config::BotConfig;
use crate::db::{Conversations, RiskProfiles, StateStore};
use crate::error::{HandlerError, HandlerResult, SizingError, StoreError};
use crate::models::{
    Command, Conversation, ConversationState, IncomingMessage, RiskProfile, StateTag,
};
use crate::signal::{is_signal, parse_positive, parse_signal};
use crate::trading::size_position;

/// Handles messages for every chat. Holds no per-chat state of its own.
pub struct Orchestrator {
    config: BotConfig,
    risk_profiles: RiskProfiles,
    conversations: Conversations,
    gateway: Arc<dyn Gateway>,
    messages: Messages,
}

impl Orchestrator {
    pub fn new(store: Arc<dyn StateStore>, gateway: Arc<dyn Gateway>, config: BotConfig) -> Self {
        let messages = Messages::new(config.locale, config.support_username.clone());
        Self {
            risk_profiles: RiskProfiles::new(store.clone()),
            conversations: Conversations::new(store),
            gateway,
            messages,
            config,
        }
    }

    pub fn config(&self) -> &BotConfig {
        &self.config
    }

    /// Handle one inbound message to completion. Never fails: every error
    /// ends as a reply to the chat and a log line.
    pub async fn handle(&self, message: IncomingMessage) {
        let span = info_span!("message", chat_id = message.chat_id, user_id = message.user_id);

        async {
            let lag_ms = (Utc::now() - message.sent_at).num_milliseconds();
            debug!(lag_ms, command = ?message.command, "Handling message");

            if let Err(e) = self.route(&message).await {
                self.report(message.chat_id, e).await;
            }
        }
        .instrument(span)
        .await
    }

    async fn route(&self, message: &IncomingMessage) -> HandlerResult<()> {
        match &message.command {
            Some(Command::Start) => return self.on_start(message).await,
            Some(Command::NewRiskPercent) => return self.on_new_risk_percent(message).await,
            Some(Command::Other(name)) => {
                debug!(command = %name, "Ignoring unknown command");
                return Ok(());
            }
            None => {}
        }

        if is_signal(&message.text) {
            return self.on_signal(message).await;
        }

        let state = self.load_state(message.chat_id).await?;
        debug!(state = state.state.as_str(), "Loaded conversation state");

        // the deposit payload is decoded only once the amount is valid
        if state.state == StateTag::AwaitingDeposit {
            return self.on_deposit(message, &state).await;
        }

        match state.decode().map_err(HandlerError::CorruptState)? {
            Conversation::AwaitingRiskPercentage => self.on_risk_percentage(message).await,
            _ => {
                self.send(message.chat_id, self.messages.send_signal()).await;
                Ok(())
            }
        }
    }

    async fn on_start(&self, message: &IncomingMessage) -> HandlerResult<()> {
        let profile = self.load_risk_profile(message.user_id).await?;
        let needs_setup = !profile.is_configured();

        self.send(message.chat_id, &self.messages.welcome(needs_setup))
            .await;

        if needs_setup {
            self.prompt_risk_percentage(message.chat_id, profile).await
        } else {
            self.send(message.chat_id, self.messages.send_signal()).await;
            Ok(())
        }
    }

    async fn on_new_risk_percent(&self, message: &IncomingMessage) -> HandlerResult<()> {
        let profile = self.load_risk_profile(message.user_id).await?;
        self.prompt_risk_percentage(message.chat_id, profile).await
    }

    async fn prompt_risk_percentage(
        &self,
        chat_id: i64,
        profile: RiskProfile,
    ) -> HandlerResult<()> {
        self.conversations
            .set(chat_id, StateTag::AwaitingRiskPercentage, "")
            .await
            .map_err(HandlerError::store("set current state"))?;

        self.send(chat_id, &self.messages.risk_prompt(profile.percentage()))
            .await;
        Ok(())
    }

    async fn on_risk_percentage(&self, message: &IncomingMessage) -> HandlerResult<()> {
        let Some(percentage) = parse_positive(&message.text) else {
            debug!(text = %message.text, "Rejected risk percentage");
            self.send(message.chat_id, self.messages.invalid_number()).await;
            return Ok(());
        };

        self.risk_profiles
            .set(message.user_id, percentage)
            .await
            .map_err(HandlerError::store("set risk percentage"))?;

        self.conversations
            .clear(message.chat_id)
            .await
            .map_err(HandlerError::store("delete current state"))?;

        info!(risk = %percentage, "Risk percentage updated");

        self.send(message.chat_id, self.messages.risk_updated()).await;
        self.send(message.chat_id, self.messages.send_signal()).await;
        Ok(())
    }

    async fn on_signal(&self, message: &IncomingMessage) -> HandlerResult<()> {
        let offer = parse_signal(&message.text)?;
        let data = offer
            .to_payload()
            .map_err(|e| HandlerError::store("encode trade offer")(StoreError::from(e)))?;

        self.conversations
            .set(message.chat_id, StateTag::AwaitingDeposit, data)
            .await
            .map_err(HandlerError::store("set current state"))?;

        info!(
            code = %offer.crypto_code,
            min = %offer.min_range_price,
            max = %offer.max_range_price,
            stop = %offer.stop_price,
            stop_pct = %offer.stop_percentage,
            "Signal parsed"
        );

        self.send(message.chat_id, self.messages.deposit_prompt()).await;
        Ok(())
    }

    async fn on_deposit(
        &self,
        message: &IncomingMessage,
        state: &ConversationState,
    ) -> HandlerResult<()> {
        let Some(deposit) = parse_positive(&message.text) else {
            debug!(text = %message.text, "Rejected deposit");
            self.send(message.chat_id, self.messages.invalid_number()).await;
            return Ok(());
        };

        let offer = match state.decode().map_err(HandlerError::CorruptState)? {
            Conversation::AwaitingDeposit(offer) => offer,
            other => {
                return Err(HandlerError::CorruptState(format!(
                    "expected a trade offer, found {:?}",
                    other
                )))
            }
        };

        let profile = self.load_risk_profile(message.user_id).await?;
        let size = size_position(deposit, profile.percentage(), &offer)?;

        info!(
            code = %offer.crypto_code,
            deposit = %deposit,
            risk = %size.risk_percentage,
            volume = %size.position_volume,
            "Position sized"
        );

        self.send(message.chat_id, &self.messages.sizing_result(&offer, &size))
            .await;

        if self.config.clear_state_after_calculation {
            self.conversations
                .clear(message.chat_id)
                .await
                .map_err(HandlerError::store("delete current state"))?;
        }
        Ok(())
    }

    async fn load_risk_profile(&self, user_id: i64) -> HandlerResult<RiskProfile> {
        self.risk_profiles
            .get(user_id)
            .await
            .map_err(HandlerError::store("get risk percentage"))
    }

    async fn load_state(&self, chat_id: i64) -> HandlerResult<ConversationState> {
        self.conversations.get(chat_id).await.map_err(|e| {
            if matches!(e, StoreError::Decode { .. }) {
                HandlerError::CorruptState(e.to_string())
            } else {
                HandlerError::store("get current state")(e)
            }
        })
    }

    /// Turn a failed step into a log line and a reply.
    async fn report(&self, chat_id: i64, err: HandlerError) {
        match &err {
            HandlerError::Store { op, source } => {
                error!(op = %op, error = %source, "State store failure");
                self.send(chat_id, &self.messages.internal_error()).await;
            }
            HandlerError::CorruptState(reason) => {
                error!(reason = %reason, "Corrupt conversation state, resetting chat");
                self.reset(chat_id).await;
                self.send(chat_id, &self.messages.internal_error()).await;
            }
            HandlerError::Signal(e) => {
                warn!(error = %e, "Could not parse signal");
                self.send(chat_id, self.messages.unrecognized_signal()).await;
            }
            HandlerError::Sizing(SizingError::Overflow) => {
                warn!(error = %err, "Deposit out of range");
                self.send(chat_id, self.messages.invalid_number()).await;
            }
            HandlerError::Sizing(e) => {
                warn!(error = %e, "Signal cannot be sized, resetting chat");
                self.reset(chat_id).await;
                self.send(chat_id, self.messages.unusable_signal()).await;
            }
        }
    }

    async fn reset(&self, chat_id: i64) {
        if let Err(e) = self.conversations.clear(chat_id).await {
            error!(op = "delete current state", error = %e, "State store failure");
        }
    }

    /// Fire-and-forget send; failures are only logged.
    async fn send(&self, chat_id: i64, text: &str) {
        if let Err(e) = self.gateway.send_message(chat_id, text).await {
            warn!(error = %e, "Failed to send telegram message");
        }
    }
}
