// src/error.rs
use crate::types::Direction;
use rust_decimal::Decimal;
use thiserror::Error;

pub type TradeResult<T> = std::result::Result<T, TradeError>;

#[derive(Debug, Error)]
pub enum TradeError {
    // --- Transport / API ---
    #[error("transport error: {0}")]
    Transport(String),

    #[error("exchange API error {code}: {msg}")]
    Api { code: String, msg: String },

    // --- Validation ---
    #[error("missing field: {0}")]
    MissingField(String),

    #[error("invalid number in field {field}: {value:?}")]
    InvalidNumber { field: String, value: String },

    #[error("either order id or client order id must be provided")]
    MissingOrderIdentifier,

    // --- Policy ---
    #[error("position limit reached for {0}")]
    PositionLimitReached(Direction),

    #[error("order notional {notional} is below the exchange minimum of {minimum}")]
    BelowMinimumNotional { notional: Decimal, minimum: Decimal },

    #[error("no usable balance")]
    NoBalance,

    // --- Data quality ---
    #[error("market data unavailable: {0}")]
    DataUnavailable(String),

    #[error("insufficient candle data: need {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    #[error("candle window has zero total volume")]
    ZeroVolume,

    // --- Providers ---
    #[error("balance unavailable: {0}")]
    BalanceUnavailable(String),

    #[error("symbol precision unavailable: {0}")]
    PrecisionUnavailable(String),

    // --- Monitoring ---
    #[error("order {client_oid} not terminal after {polls} polls")]
    MonitorTimeout { client_oid: String, polls: u32 },
}

impl TradeError {
    /// Отказы по правилам риска, а не сбои: логируются как warn.
    pub fn is_policy(&self) -> bool {
        matches!(
            self,
            TradeError::PositionLimitReached(_)
                | TradeError::BelowMinimumNotional { .. }
                | TradeError::NoBalance
        )
    }
}

impl From<reqwest::Error> for TradeError {
    fn from(e: reqwest::Error) -> Self {
        TradeError::Transport(e.to_string())
    }
}

impl From<serde_json::Error> for TradeError {
    fn from(e: serde_json::Error) -> Self {
        TradeError::Transport(format!("malformed response: {}", e))
    }
}

impl From<serde_urlencoded::ser::Error> for TradeError {
    fn from(e: serde_urlencoded::ser::Error) -> Self {
        TradeError::Transport(format!("query encoding failed: {}", e))
    }
}
