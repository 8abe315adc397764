// src/core/market_data.rs
use crate::connectors::messages::{parse_decimal, CandleRow};
use crate::error::{TradeError, TradeResult};
use crate::types::{Candle, Granularity, MarketSnapshot};
use chrono::{DateTime, Duration, TimeZone, Utc};

/// Максимальный возраст последней свечи относительно момента загрузки.
pub const MAX_CANDLE_AGE_SECS: i64 = 120;

/// `[ts, open, high, low, close, baseVolume, ...]` -> Candle.
/// Пустое или отсутствующее OHLCV-поле -> MissingField.
pub fn parse_candle_row(row: &CandleRow) -> TradeResult<Candle> {
    let field = |idx: usize| row.get(idx).and_then(|v| v.as_deref());

    let ts_ms = field(0)
        .ok_or_else(|| TradeError::MissingField("timestamp".to_string()))?
        .trim()
        .parse::<i64>()
        .map_err(|_| TradeError::InvalidNumber {
            field: "timestamp".to_string(),
            value: field(0).unwrap_or_default().to_string(),
        })?;
    let timestamp = Utc
        .timestamp_millis_opt(ts_ms)
        .single()
        .ok_or_else(|| TradeError::InvalidNumber {
            field: "timestamp".to_string(),
            value: ts_ms.to_string(),
        })?;

    Ok(Candle {
        timestamp,
        open: parse_decimal("open", field(1))?,
        high: parse_decimal("high", field(2))?,
        low: parse_decimal("low", field(3))?,
        close: parse_decimal("close", field(4))?,
        volume: parse_decimal("volume", field(5))?,
    })
}

/// Собирает снимок: сортировка по времени, последние `count` свечей,
/// проверка непрерывности и свежести.
pub fn build_snapshot(
    symbol: &str,
    rows: &[CandleRow],
    granularity: Granularity,
    count: usize,
    fetched_at: DateTime<Utc>,
) -> TradeResult<MarketSnapshot> {
    if rows.is_empty() {
        return Err(TradeError::DataUnavailable(format!(
            "no candles returned for {}",
            symbol
        )));
    }

    let mut candles = rows
        .iter()
        .map(parse_candle_row)
        .collect::<TradeResult<Vec<_>>>()?;
    candles.sort_by_key(|c| c.timestamp);
    if candles.len() > count {
        candles.drain(..candles.len() - count);
    }

    let step = Duration::from_std(granularity.step())
        .map_err(|e| TradeError::DataUnavailable(e.to_string()))?;
    for pair in candles.windows(2) {
        if pair[1].timestamp - pair[0].timestamp != step {
            return Err(TradeError::DataUnavailable(format!(
                "candle gap between {} and {}",
                pair[0].timestamp, pair[1].timestamp
            )));
        }
    }

    // candles не пуст: rows не пуст и каждая строка распарсена
    if let Some(latest) = candles.last() {
        let age = fetched_at - latest.timestamp;
        if age > Duration::seconds(MAX_CANDLE_AGE_SECS) {
            return Err(TradeError::DataUnavailable(format!(
                "stale candles: latest {} is {}s old",
                latest.timestamp,
                age.num_seconds()
            )));
        }
    }

    Ok(MarketSnapshot {
        symbol: symbol.to_string(),
        candles,
        fetched_at,
    })
}

#[cfg(test)]
pub(crate) fn minute_rows(
    end: DateTime<Utc>,
    n: usize,
    ohlcv: (&str, &str, &str, &str, &str),
) -> Vec<CandleRow> {
    (0..n)
        .map(|i| {
            let ts = end - Duration::minutes((n - 1 - i) as i64);
            vec![
                Some(ts.timestamp_millis().to_string()),
                Some(ohlcv.0.to_string()),
                Some(ohlcv.1.to_string()),
                Some(ohlcv.2.to_string()),
                Some(ohlcv.3.to_string()),
                Some(ohlcv.4.to_string()),
                Some("0".to_string()),
            ]
        })
        .collect()
}
