//! Data models for trade offers, conversation state, risk profiles and messages.

mod conversation;
mod message;
mod offer;
mod risk;

pub use conversation::{Conversation, ConversationState, StateTag};
pub use message::{Command, IncomingMessage};
pub use offer::{Direction, TradeOffer};
pub use risk::RiskProfile;
