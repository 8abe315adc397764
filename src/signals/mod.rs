// src/signals/mod.rs
//! Источник сигналов: поток алертов `{direction, amount?}` -> TradeSignal.
use crate::types::{Direction, TradeSignal};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{info, warn};

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RawAlert {
    pub direction: String,
    #[serde(default)]
    pub amount: Option<String>,
}

pub fn parse_direction(raw: &str) -> Option<Direction> {
    match raw.trim().to_ascii_uppercase().as_str() {
        "LONG" | "BUY" => Some(Direction::Long),
        "SHORT" | "SELL" => Some(Direction::Short),
        _ => None,
    }
}

/// Алерт с неизвестным направлением или битым amount пропускается.
pub fn alert_to_signal(alert: &RawAlert, symbol: &str) -> Option<TradeSignal> {
    let direction = match parse_direction(&alert.direction) {
        Some(d) => d,
        None => {
            warn!("⚠️ Unknown direction in alert: {:?}", alert.direction);
            return None;
        }
    };

    let amount = match alert.amount.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => match Decimal::from_str(raw) {
            Ok(v) => Some(v),
            Err(_) => {
                warn!("⚠️ Invalid decimal amount in alert: {:?}", raw);
                return None;
            }
        },
    };

    Some(TradeSignal {
        direction,
        symbol: symbol.to_string(),
        amount,
    })
}

/// JSON (`{"direction":"LONG","amount":"0.01"}`) или текст (`LONG`, `SHORT 0.5`).
pub fn parse_line(line: &str) -> Option<RawAlert> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    if line.starts_with('{') {
        return match serde_json::from_str::<RawAlert>(line) {
            Ok(alert) => Some(alert),
            Err(e) => {
                warn!("⚠️ Malformed alert JSON: {}", e);
                None
            }
        };
    }

    let mut parts = line.split_whitespace();
    let direction = parts.next()?.to_string();
    let amount = parts.next().map(str::to_string);
    Some(RawAlert { direction, amount })
}

/// Читает алерты построчно и пересылает сигналы в канал движка.
pub struct SignalSource<R> {
    reader: R,
    symbol: String,
}

impl SignalSource<BufReader<tokio::io::Stdin>> {
    pub fn stdin(symbol: String) -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), symbol)
    }
}

impl<R> SignalSource<R>
where
    R: AsyncBufRead + Unpin,
{
    pub fn new(reader: R, symbol: String) -> Self {
        Self { reader, symbol }
    }

    /// Returns when the input ends or the engine side of the channel is gone.
    pub async fn run(mut self, sender: mpsc::Sender<TradeSignal>) -> std::io::Result<()> {
        let mut line = String::new();
        loop {
            line.clear();
            if self.reader.read_line(&mut line).await? == 0 {
                info!("Signal input closed");
                return Ok(());
            }

            let Some(signal) = parse_line(&line).and_then(|a| alert_to_signal(&a, &self.symbol))
            else {
                continue;
            };

            info!("📨 Alert received: {} {}", signal.direction, signal.symbol);
            if sender.send(signal).await.is_err() {
                warn!("Engine channel closed, dropping signal input");
                return Ok(());
            }
        }
    }
}
