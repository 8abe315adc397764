// src/utils/precision.rs
use rust_decimal::{Decimal, RoundingStrategy};

/// Отбрасывает лишние знаки (к нулю), никогда не увеличивая модуль.
/// Пример: value=1.2399, places=3 -> 1.239
pub fn truncate_to_places(value: Decimal, places: u32) -> Decimal {
    value.round_dp_with_strategy(places, RoundingStrategy::ToZero)
}

/// Округляет до БЛИЖАЙШЕГО значения с `places` знаками (половина от нуля).
/// Пример: 99.405 -> 99.41
pub fn round_to_places(value: Decimal, places: u32) -> Decimal {
    value.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero)
}

/// Округляет до `digits` значащих цифр (половина к чётному, как в десятичном контексте).
pub fn round_significant(value: Decimal, digits: u32) -> Decimal {
    value
        .round_sf_with_strategy(digits, RoundingStrategy::MidpointNearestEven)
        .unwrap_or(value)
}
