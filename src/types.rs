// src/types.rs
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Направление сигнала (LONG / SHORT).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Long,
    Short,
}

impl Direction {
    pub fn side(self) -> Side {
        match self {
            Direction::Long => Side::Buy,
            Direction::Short => Side::Sell,
        }
    }

    /// Сторона позиции для настроек плеча в isolated-режиме.
    pub fn hold_side(self) -> &'static str {
        match self {
            Direction::Long => "long",
            Direction::Short => "short",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Long => write!(f, "LONG"),
            Direction::Short => write!(f, "SHORT"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn as_str(self) -> &'static str {
        match self {
            Side::Buy => "buy",
            Side::Sell => "sell",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TradeSignal {
    pub direction: Direction,
    pub symbol: String,
    /// Informational amount carried by the alert; sizing ignores it.
    pub amount: Option<Decimal>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccountBalance {
    pub available_quote: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Candle {
    pub timestamp: DateTime<Utc>,
    #[allow(dead_code)]
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: Decimal,
}

/// Свечи в хронологическом порядке, без пропусков и свежие на момент загрузки.
#[derive(Debug, Clone)]
pub struct MarketSnapshot {
    pub symbol: String,
    pub candles: Vec<Candle>,
    pub fetched_at: DateTime<Utc>,
}

/// Candle interval as understood by the candles endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum Granularity {
    #[serde(rename = "1m")]
    OneMinute,
    #[serde(rename = "5m")]
    FiveMinutes,
    #[serde(rename = "15m")]
    FifteenMinutes,
    #[serde(rename = "30m")]
    ThirtyMinutes,
    #[serde(rename = "1H")]
    OneHour,
    #[serde(rename = "4H")]
    FourHours,
    #[serde(rename = "1D")]
    OneDay,
}

impl Granularity {
    pub fn as_str(self) -> &'static str {
        match self {
            Granularity::OneMinute => "1m",
            Granularity::FiveMinutes => "5m",
            Granularity::FifteenMinutes => "15m",
            Granularity::ThirtyMinutes => "30m",
            Granularity::OneHour => "1H",
            Granularity::FourHours => "4H",
            Granularity::OneDay => "1D",
        }
    }

    pub fn step(self) -> Duration {
        let secs = match self {
            Granularity::OneMinute => 60,
            Granularity::FiveMinutes => 5 * 60,
            Granularity::FifteenMinutes => 15 * 60,
            Granularity::ThirtyMinutes => 30 * 60,
            Granularity::OneHour => 60 * 60,
            Granularity::FourHours => 4 * 60 * 60,
            Granularity::OneDay => 24 * 60 * 60,
        };
        Duration::from_secs(secs)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SymbolPrecision {
    pub price_precision: u32,
    pub size_precision: u32,
    pub size_multiplier: Decimal,
    pub min_notional: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderIntent {
    pub symbol: String,
    pub side: Side,
    pub size_contracts: Decimal,
    pub stop_loss: Decimal,
    pub take_profit: Decimal,
    pub client_order_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Open,
    Filled,
    Cancelled,
    Closed,
    Fail,
    Unknown,
}

impl OrderStatus {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "open" | "live" | "new" | "partially_filled" => OrderStatus::Open,
            "filled" => OrderStatus::Filled,
            "cancelled" | "canceled" => OrderStatus::Cancelled,
            "closed" => OrderStatus::Closed,
            "fail" | "failed" => OrderStatus::Fail,
            _ => OrderStatus::Unknown,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            OrderStatus::Filled | OrderStatus::Cancelled | OrderStatus::Closed | OrderStatus::Fail
        )
    }
}

/// Ответ биржи на размещение/изменение ордера (код не интерпретируется здесь).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderResponse {
    pub code: String,
    pub msg: String,
    pub order_id: Option<String>,
    pub client_oid: Option<String>,
}

impl OrderResponse {
    pub fn is_success(&self) -> bool {
        self.code == crate::connectors::messages::SUCCESS_CODE
    }
}

/// Результат успешной обработки сигнала.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmittedOrder {
    pub direction: Direction,
    pub intent: OrderIntent,
    pub exchange_order_id: Option<String>,
    /// false в paper-режиме: ордер не отправлялся.
    pub live: bool,
}

#[derive(Debug, Clone)]
pub struct ModifyOrderRequest {
    pub symbol: String,
    pub product_type: String,
    pub order_id: Option<String>,
    pub client_oid: Option<String>,
    pub new_take_profit: String,
    pub new_client_oid: Option<String>,
}
