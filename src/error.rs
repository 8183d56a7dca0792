//! Error types for the signal parser, sizing calculator, state store and orchestrator.

use rust_decimal::Decimal;
use thiserror::Error;

/// Failure talking to the state store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database operation failed: {0}")]
    Database(#[from] sqlx::Error),

    #[error("failed to encode stored value: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("failed to decode stored value for {key}: {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("stored value for {key} is not a decimal: {value:?}")]
    InvalidDecimal { key: String, value: String },
}

/// A message passed the signal eligibility check but could not be fully extracted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("message is not a trade signal")]
    NotASignal,

    #[error("no instrument code found")]
    MissingInstrument,

    #[error("no price range found")]
    MissingRange,

    #[error("no stop price found")]
    MissingStop,

    #[error("invalid number in signal: {0:?}")]
    InvalidNumber(String),

    #[error("price range is inverted: {min} > {max}")]
    InvertedRange { min: Decimal, max: Decimal },
}

/// The sizing formula cannot produce a result for these inputs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SizingError {
    #[error("{0} is zero")]
    ZeroDivisor(&'static str),

    #[error("position size is out of the decimal range")]
    Overflow,
}

/// A single orchestrator step that could not complete.
#[derive(Error, Debug)]
pub enum HandlerError {
    #[error("{op}: {source}")]
    Store {
        op: &'static str,
        #[source]
        source: StoreError,
    },

    #[error("corrupt conversation state: {0}")]
    CorruptState(String),

    #[error("failed to parse signal: {0}")]
    Signal(#[from] ParseError),

    #[error("failed to size position: {0}")]
    Sizing(#[from] SizingError),
}

impl HandlerError {
    /// Wrap a store failure with the name of the operation that triggered it.
    pub fn store(op: &'static str) -> impl FnOnce(StoreError) -> Self {
        move |source| Self::Store { op, source }
    }
}

pub type HandlerResult<T> = std::result::Result<T, HandlerError>;
