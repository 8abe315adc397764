// src/connectors/messages.rs
//! Wire-форматы REST API Bitget (mix / USDT-фьючерсы).
//! Все числа приходят строками и парсятся сразу в Decimal.
use crate::error::{TradeError, TradeResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub const SUCCESS_CODE: &str = "00000";

/// Общая обёртка ответа: `{"code":"00000","msg":"success","data":...}`.
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope<T> {
    pub code: String,
    #[serde(default)]
    pub msg: String,
    pub data: Option<T>,
}

impl<T> ApiEnvelope<T> {
    /// Возвращает `data`, если код успешный; иначе `TradeError::Api`.
    pub fn into_data(self) -> TradeResult<T> {
        if self.code != SUCCESS_CODE {
            return Err(TradeError::Api {
                code: self.code,
                msg: self.msg,
            });
        }
        self.data
            .ok_or_else(|| TradeError::MissingField("data".to_string()))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountData {
    pub margin_coin: Option<String>,
    pub available: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TickerData {
    pub symbol: Option<String>,
    pub last_pr: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractData {
    pub symbol: String,
    pub price_place: Option<String>,
    pub volume_place: Option<String>,
    pub size_multiplier: Option<String>,
}

/// Строка свечи: `[ts, open, high, low, close, baseVolume, quoteVolume]`.
pub type CandleRow = Vec<Option<String>>;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderIdData {
    pub order_id: Option<String>,
    pub client_oid: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetailData {
    pub order_id: Option<String>,
    pub client_oid: Option<String>,
    #[serde(alias = "status")]
    pub state: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderBody {
    pub symbol: String,
    pub product_type: String,
    pub margin_mode: String,
    pub margin_coin: String,
    pub size: String,
    pub side: String,
    pub order_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_oid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preset_stop_surplus_price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preset_stop_loss_price: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifyOrderBody {
    pub symbol: String,
    pub product_type: String,
    pub new_client_oid: String,
    pub new_preset_stop_surplus_price: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_oid: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetLeverageBody {
    pub symbol: String,
    pub product_type: String,
    pub margin_coin: String,
    pub leverage: String,
    pub hold_side: String,
}

/// Обязательное числовое поле: отсутствие -> MissingField, мусор -> InvalidNumber.
pub fn parse_decimal(field: &str, raw: Option<&str>) -> TradeResult<Decimal> {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| TradeError::MissingField(field.to_string()))?;
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .map_err(|_| TradeError::InvalidNumber {
            field: field.to_string(),
            value: raw.to_string(),
        })
}

/// Необязательное поле ордера: значение отбрасывается, если не парсится как Decimal.
pub fn sanitize_decimal(raw: &str) -> Option<String> {
    Decimal::from_str(raw.trim()).ok().map(|d| d.to_string())
}
