// src/core/vwap.rs
use crate::error::{TradeError, TradeResult};
use crate::types::Candle;
use crate::utils::precision::round_significant;
use rust_decimal::Decimal;

/// Окно VWAP (последние N свечей).
pub const VWAP_WINDOW: usize = 60;

/// Значащие цифры каждой промежуточной операции.
pub const VWAP_SIGNIFICANT_DIGITS: u32 = 10;

fn sig(value: Decimal) -> Decimal {
    round_significant(value, VWAP_SIGNIFICANT_DIGITS)
}

/// VWAP = Σ(TP × V) / ΣV по последним 60 свечам, TP = (H + L + C) / 3.
///
/// Each arithmetic step is rounded to 10 significant digits so the result is
/// reproducible regardless of how many digits the inputs carry.
pub fn calculate_vwap(candles: &[Candle]) -> TradeResult<Decimal> {
    if candles.len() < VWAP_WINDOW {
        return Err(TradeError::InsufficientData {
            needed: VWAP_WINDOW,
            got: candles.len(),
        });
    }

    let window = &candles[candles.len() - VWAP_WINDOW..];
    let three = Decimal::from(3);

    let mut tpv_sum = Decimal::ZERO;
    let mut volume_sum = Decimal::ZERO;
    for candle in window {
        let typical = sig(sig(sig(candle.high + candle.low) + candle.close) / three);
        tpv_sum = sig(tpv_sum + sig(typical * candle.volume));
        volume_sum = sig(volume_sum + candle.volume);
    }

    if volume_sum.is_zero() {
        return Err(TradeError::ZeroVolume);
    }

    Ok(sig(tpv_sum / volume_sum))
}
