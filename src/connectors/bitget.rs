// src/connectors/bitget.rs
use crate::config::AppConfig;
use crate::connectors::messages::{
    parse_decimal, sanitize_decimal, AccountData, ApiEnvelope, CandleRow, ContractData,
    ModifyOrderBody, OrderDetailData, OrderIdData, PlaceOrderBody, SetLeverageBody, TickerData,
};
use crate::connectors::signer::{RequestSigner, SignatureEncoding};
use crate::connectors::traits::ExchangeClient;
use crate::core::engine::MIN_NOTIONAL;
use crate::core::market_data::build_snapshot;
use crate::error::{TradeError, TradeResult};
use crate::types::{
    AccountBalance, Direction, Granularity, MarketSnapshot, ModifyOrderRequest, OrderIntent,
    OrderResponse, OrderStatus, SymbolPrecision,
};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, Method};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, error, info};
use uuid::Uuid;

const ACCOUNT_PATH: &str = "/api/v2/mix/account/account";
const SET_LEVERAGE_PATH: &str = "/api/v2/mix/account/set-leverage";
const CANDLES_PATH: &str = "/api/v2/mix/market/candles";
const TICKER_PATH: &str = "/api/v2/mix/market/ticker";
const CONTRACTS_PATH: &str = "/api/v2/mix/market/contracts";
const PLACE_ORDER_PATH: &str = "/api/v2/mix/order/place-order";
const ORDER_DETAIL_PATH: &str = "/api/v2/mix/order/detail";
const MODIFY_ORDER_PATH: &str = "/api/v2/mix/order/modify-order";

pub struct BitgetClient {
    signer: RequestSigner,
    http_client: Client,
    base_rest_url: String,
    symbol: String,
    product_type: String,
    margin_coin: String,
    precision_cache: RwLock<HashMap<String, SymbolPrecision>>,
}

impl BitgetClient {
    pub fn new(config: &AppConfig) -> TradeResult<Self> {
        let http_client = Client::builder()
            .timeout(config.http_timeout())
            .build()?;

        Ok(Self {
            signer: RequestSigner::new(
                config.api_key.clone(),
                config.secret_key.clone(),
                config.passphrase.clone(),
                config.locale.clone(),
            ),
            http_client,
            base_rest_url: config.base_url.trim_end_matches('/').to_string(),
            symbol: config.symbol.clone(),
            product_type: config.product_type.clone(),
            margin_coin: config.margin_coin.clone(),
            precision_cache: RwLock::new(HashMap::new()),
        })
    }

    fn timestamp() -> String {
        Utc::now().timestamp_millis().to_string()
    }

    /// Тело ответа декодируется как envelope даже при HTTP 4xx: биржа кладёт туда код ошибки.
    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> TradeResult<ApiEnvelope<T>> {
        let status = response.status();
        let text = response.text().await?;
        match serde_json::from_str::<ApiEnvelope<T>>(&text) {
            Ok(envelope) => Ok(envelope),
            Err(_) if !status.is_success() => Err(TradeError::Transport(format!(
                "HTTP {}: {}",
                status, text
            ))),
            Err(e) => Err(e.into()),
        }
    }

    async fn send_public<T: DeserializeOwned>(
        &self,
        path: &str,
        params: Vec<(&str, String)>,
    ) -> TradeResult<ApiEnvelope<T>> {
        let query = serde_urlencoded::to_string(&params)?;
        let url = format!("{}{}?{}", self.base_rest_url, path, query);
        debug!("GET {}", url);

        let response = self.http_client.get(&url).send().await?;
        Self::decode(response).await
    }

    async fn send_signed_get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: Vec<(&str, String)>,
    ) -> TradeResult<ApiEnvelope<T>> {
        let query = serde_urlencoded::to_string(&params)?;
        let timestamp = Self::timestamp();
        let headers = self.signer.headers(
            &timestamp,
            &Method::GET,
            path,
            Some(&query),
            "",
            SignatureEncoding::Base64,
        )?;
        let url = format!("{}{}?{}", self.base_rest_url, path, query);
        debug!("GET (signed) {}", url);

        let response = self.http_client.get(&url).headers(headers).send().await?;
        Self::decode(response).await
    }

    async fn send_signed_post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> TradeResult<ApiEnvelope<T>> {
        let body = serde_json::to_string(body)?;
        let timestamp = Self::timestamp();
        let headers = self.signer.headers(
            &timestamp,
            &Method::POST,
            path,
            None,
            &body,
            SignatureEncoding::Hex,
        )?;
        let url = format!("{}{}", self.base_rest_url, path);
        debug!("POST {} {}", url, body);

        let response = self
            .http_client
            .post(&url)
            .headers(headers)
            .body(body)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn fetch_balance(&self) -> TradeResult<Decimal> {
        let envelope: ApiEnvelope<AccountData> = self
            .send_signed_get(
                ACCOUNT_PATH,
                vec![
                    ("symbol", self.symbol.clone()),
                    ("productType", self.product_type.clone()),
                    ("marginCoin", self.margin_coin.clone()),
                ],
            )
            .await?;
        let account = envelope.into_data()?;
        let available = parse_decimal("available", account.available.as_deref())?;
        debug!(
            "Account {:?}: available {}",
            account.margin_coin, available
        );
        if available.is_sign_negative() {
            return Err(TradeError::BalanceUnavailable(format!(
                "negative available balance {}",
                available
            )));
        }
        Ok(available)
    }

    async fn fetch_contract(&self, symbol: &str) -> TradeResult<SymbolPrecision> {
        let envelope: ApiEnvelope<Vec<ContractData>> = self
            .send_public(
                CONTRACTS_PATH,
                vec![
                    ("symbol", symbol.to_string()),
                    ("productType", self.product_type.clone()),
                ],
            )
            .await?;
        let contract = envelope
            .into_data()?
            .into_iter()
            .find(|c| c.symbol.eq_ignore_ascii_case(symbol))
            .ok_or_else(|| TradeError::MissingField(format!("contract {}", symbol)))?;

        let places = |field: &str, raw: Option<&str>| -> TradeResult<u32> {
            raw.and_then(|v| v.trim().parse::<u32>().ok())
                .ok_or_else(|| TradeError::MissingField(field.to_string()))
        };

        Ok(SymbolPrecision {
            price_precision: places("pricePlace", contract.price_place.as_deref())?,
            size_precision: places("volumePlace", contract.volume_place.as_deref())?,
            size_multiplier: parse_decimal("sizeMultiplier", contract.size_multiplier.as_deref())?,
            min_notional: MIN_NOTIONAL,
        })
    }

    async fn fetch_ticker(&self, symbol: &str) -> TradeResult<Decimal> {
        let envelope: ApiEnvelope<Vec<TickerData>> = self
            .send_public(
                TICKER_PATH,
                vec![
                    ("symbol", symbol.to_string()),
                    ("productType", self.product_type.clone()),
                ],
            )
            .await?;
        let tickers = envelope.into_data()?;
        let ticker = tickers
            .iter()
            .find(|t| {
                t.symbol
                    .as_deref()
                    .map_or(false, |s| s.eq_ignore_ascii_case(symbol))
            })
            .ok_or_else(|| TradeError::MissingField(format!("ticker {}", symbol)))?;
        parse_decimal("lastPr", ticker.last_pr.as_deref())
    }

    fn order_response(envelope: ApiEnvelope<OrderIdData>) -> OrderResponse {
        let (order_id, client_oid) = envelope
            .data
            .map(|d| (d.order_id, d.client_oid))
            .unwrap_or((None, None));
        OrderResponse {
            code: envelope.code,
            msg: envelope.msg,
            order_id,
            client_oid,
        }
    }
}

#[async_trait]
impl ExchangeClient for BitgetClient {
    async fn get_available_balance(&self) -> TradeResult<AccountBalance> {
        self.fetch_balance()
            .await
            .map(|available_quote| AccountBalance { available_quote })
            .map_err(|e| match e {
                TradeError::BalanceUnavailable(_) => e,
                other => TradeError::BalanceUnavailable(other.to_string()),
            })
    }

    async fn fetch_recent_candles(
        &self,
        symbol: &str,
        granularity: Granularity,
        count: usize,
    ) -> TradeResult<MarketSnapshot> {
        info!("Fetching {} {} candles for {}", count, granularity.as_str(), symbol);
        let fetched_at = Utc::now();
        let envelope: ApiEnvelope<Vec<CandleRow>> = self
            .send_public(
                CANDLES_PATH,
                vec![
                    ("symbol", symbol.to_string()),
                    ("granularity", granularity.as_str().to_string()),
                    ("productType", self.product_type.clone()),
                    ("limit", count.to_string()),
                ],
            )
            .await
            .map_err(|e| TradeError::DataUnavailable(e.to_string()))?;
        let rows = envelope
            .into_data()
            .map_err(|e| TradeError::DataUnavailable(e.to_string()))?;

        build_snapshot(symbol, &rows, granularity, count, fetched_at)
    }

    async fn fetch_last_price(&self, symbol: &str) -> TradeResult<Decimal> {
        self.fetch_ticker(symbol)
            .await
            .map_err(|e| TradeError::DataUnavailable(format!("last price for {}: {}", symbol, e)))
    }

    async fn get_symbol_precision(&self, symbol: &str) -> TradeResult<SymbolPrecision> {
        if let Some(cached) = self.precision_cache.read().await.get(symbol) {
            return Ok(*cached);
        }

        let precision = self
            .fetch_contract(symbol)
            .await
            .map_err(|e| TradeError::PrecisionUnavailable(format!("{}: {}", symbol, e)))?;
        info!(
            "Precision for {}: price {} dp, size {} dp, multiplier {}",
            symbol, precision.price_precision, precision.size_precision, precision.size_multiplier
        );
        self.precision_cache
            .write()
            .await
            .insert(symbol.to_string(), precision);
        Ok(precision)
    }

    async fn set_leverage(
        &self,
        symbol: &str,
        leverage: u32,
        direction: Direction,
    ) -> TradeResult<()> {
        info!("Setting leverage {}x for {} {}", leverage, symbol, direction);
        let body = SetLeverageBody {
            symbol: symbol.to_string(),
            product_type: self.product_type.clone(),
            margin_coin: self.margin_coin.clone(),
            leverage: leverage.to_string(),
            hold_side: direction.hold_side().to_string(),
        };
        let envelope: ApiEnvelope<serde_json::Value> =
            self.send_signed_post(SET_LEVERAGE_PATH, &body).await?;
        envelope.into_data().map(|_| ())
    }

    async fn submit_order(&self, intent: &OrderIntent) -> TradeResult<OrderResponse> {
        let size = sanitize_decimal(&intent.size_contracts.to_string())
            .ok_or_else(|| TradeError::InvalidNumber {
                field: "size".to_string(),
                value: intent.size_contracts.to_string(),
            })?;

        let body = PlaceOrderBody {
            symbol: intent.symbol.clone(),
            product_type: self.product_type.clone(),
            margin_mode: "isolated".to_string(),
            margin_coin: self.margin_coin.clone(),
            size,
            side: intent.side.as_str().to_string(),
            order_type: "market".to_string(),
            client_oid: Some(intent.client_order_id.clone()).filter(|s| !s.is_empty()),
            preset_stop_surplus_price: sanitize_decimal(&intent.take_profit.to_string()),
            preset_stop_loss_price: sanitize_decimal(&intent.stop_loss.to_string()),
        };

        let envelope: ApiEnvelope<OrderIdData> = self
            .send_signed_post(PLACE_ORDER_PATH, &body)
            .await
            .map_err(|e| {
                error!("Place order failed: {}", e);
                e
            })?;
        Ok(Self::order_response(envelope))
    }

    async fn get_order_status(&self, symbol: &str, client_oid: &str) -> TradeResult<OrderStatus> {
        let envelope: ApiEnvelope<OrderDetailData> = self
            .send_signed_get(
                ORDER_DETAIL_PATH,
                vec![
                    ("symbol", symbol.to_uppercase()),
                    ("productType", self.product_type.clone()),
                    ("clientOid", client_oid.to_string()),
                ],
            )
            .await?;
        let detail = envelope.into_data()?;
        debug!(
            "Order detail: id {:?}, client oid {:?}, state {:?}",
            detail.order_id, detail.client_oid, detail.state
        );
        Ok(detail
            .state
            .as_deref()
            .map(OrderStatus::parse)
            .unwrap_or(OrderStatus::Unknown))
    }

    async fn modify_order(&self, request: &ModifyOrderRequest) -> TradeResult<OrderResponse> {
        let order_id = request.order_id.clone().filter(|s| !s.is_empty());
        let client_oid = request.client_oid.clone().filter(|s| !s.is_empty());
        if order_id.is_none() && client_oid.is_none() {
            return Err(TradeError::MissingOrderIdentifier);
        }
        let new_tp = sanitize_decimal(&request.new_take_profit).ok_or_else(|| {
            TradeError::InvalidNumber {
                field: "newPresetStopSurplusPrice".to_string(),
                value: request.new_take_profit.clone(),
            }
        })?;

        let body = ModifyOrderBody {
            symbol: request.symbol.clone(),
            product_type: request.product_type.clone(),
            new_client_oid: request
                .new_client_oid
                .clone()
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            new_preset_stop_surplus_price: new_tp,
            order_id,
            client_oid,
        };

        info!("✏️ Modifying take-profit: {:?}", body);
        let envelope: ApiEnvelope<OrderIdData> =
            self.send_signed_post(MODIFY_ORDER_PATH, &body).await?;
        Ok(Self::order_response(envelope))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;
    use crate::core::market_data::minute_rows;
    use crate::types::Side;
    use mockito::{Matcher, Server};
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn client(server: &Server) -> BitgetClient {
        BitgetClient::new(&test_config(&server.url())).unwrap()
    }

    fn ok_body(data: serde_json::Value) -> String {
        json!({"code": "00000", "msg": "success", "requestTime": 1, "data": data}).to_string()
    }

    fn intent() -> OrderIntent {
        OrderIntent {
            symbol: "BTCUSDT".to_string(),
            side: Side::Buy,
            size_contracts: dec!(0.2),
            stop_loss: dec!(49700.00),
            take_profit: dec!(50500.00),
            client_order_id: "oid-1".to_string(),
        }
    }

    #[tokio::test]
    async fn test_balance_is_signed_and_parsed() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", ACCOUNT_PATH)
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("productType".into(), "USDT-FUTURES".into()),
                Matcher::UrlEncoded("marginCoin".into(), "USDT".into()),
            ]))
            .match_header("access-key", "key")
            .match_header("access-passphrase", "phrase")
            .match_header("access-sign", Matcher::Regex(".+".into()))
            .match_header("access-timestamp", Matcher::Regex("^[0-9]+$".into()))
            .with_body(ok_body(json!({"marginCoin": "USDT", "available": "10000.1234"})))
            .create_async()
            .await;

        let balance = client(&server).get_available_balance().await.unwrap();

        assert_eq!(balance.available_quote, dec!(10000.1234));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_balance_api_error_is_surfaced() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", ACCOUNT_PATH)
            .match_query(Matcher::Any)
            .with_status(400)
            .with_body(r#"{"code":"40037","msg":"Apikey does not exist","data":null}"#)
            .create_async()
            .await;

        let err = client(&server).get_available_balance().await.unwrap_err();
        assert!(matches!(err, TradeError::BalanceUnavailable(ref m) if m.contains("40037")));
    }

    #[tokio::test]
    async fn test_balance_missing_field_is_not_zero() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", ACCOUNT_PATH)
            .match_query(Matcher::Any)
            .with_body(ok_body(json!({"marginCoin": "USDT"})))
            .create_async()
            .await;

        let err = client(&server).get_available_balance().await.unwrap_err();
        assert!(matches!(err, TradeError::BalanceUnavailable(_)));
    }

    #[tokio::test]
    async fn test_negative_balance_is_rejected() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", ACCOUNT_PATH)
            .match_query(Matcher::Any)
            .with_body(ok_body(json!({"marginCoin": "USDT", "available": "-1"})))
            .create_async()
            .await;

        let err = client(&server).get_available_balance().await.unwrap_err();
        assert!(matches!(err, TradeError::BalanceUnavailable(ref m) if m.contains("negative")));
    }

    #[tokio::test]
    async fn test_last_price() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", TICKER_PATH)
            .match_query(Matcher::UrlEncoded("symbol".into(), "BTCUSDT".into()))
            .with_body(ok_body(json!([{"symbol": "BTCUSDT", "lastPr": "84725.43"}])))
            .create_async()
            .await;

        let price = client(&server).fetch_last_price("BTCUSDT").await.unwrap();
        assert_eq!(price, dec!(84725.43));
    }

    #[tokio::test]
    async fn test_last_price_ignores_unnamed_ticker() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", TICKER_PATH)
            .match_query(Matcher::Any)
            .with_body(ok_body(json!([
                {"lastPr": "1.5"},
                {"symbol": "BTCUSDT", "lastPr": "84725.43"}
            ])))
            .create_async()
            .await;

        let price = client(&server).fetch_last_price("BTCUSDT").await.unwrap();
        assert_eq!(price, dec!(84725.43));
    }

    #[tokio::test]
    async fn test_last_price_transport_failure() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", TICKER_PATH)
            .match_query(Matcher::Any)
            .with_status(502)
            .with_body("bad gateway")
            .create_async()
            .await;

        let err = client(&server).fetch_last_price("BTCUSDT").await.unwrap_err();
        assert!(matches!(err, TradeError::DataUnavailable(ref m) if m.contains("502")));
    }

    #[tokio::test]
    async fn test_precision_is_cached() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", CONTRACTS_PATH)
            .match_query(Matcher::Any)
            .with_body(ok_body(json!([{
                "symbol": "BTCUSDT",
                "pricePlace": "1",
                "volumePlace": "3",
                "sizeMultiplier": "0.001"
            }])))
            .expect(1)
            .create_async()
            .await;

        let client = client(&server);
        let first = client.get_symbol_precision("BTCUSDT").await.unwrap();
        let second = client.get_symbol_precision("BTCUSDT").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.price_precision, 1);
        assert_eq!(first.size_precision, 3);
        assert_eq!(first.size_multiplier, dec!(0.001));
        assert_eq!(first.min_notional, MIN_NOTIONAL);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_unknown_symbol_precision() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", CONTRACTS_PATH)
            .match_query(Matcher::Any)
            .with_body(ok_body(json!([])))
            .create_async()
            .await;

        let err = client(&server)
            .get_symbol_precision("NOPEUSDT")
            .await
            .unwrap_err();
        assert!(matches!(err, TradeError::PrecisionUnavailable(_)));
    }

    #[tokio::test]
    async fn test_recent_candles() {
        let mut server = Server::new_async().await;
        let rows = minute_rows(Utc::now(), 60, ("100", "102", "98", "101", "3"));
        let mock = server
            .mock("GET", CANDLES_PATH)
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("granularity".into(), "1m".into()),
                Matcher::UrlEncoded("limit".into(), "60".into()),
            ]))
            .with_body(ok_body(json!(rows)))
            .create_async()
            .await;

        let snapshot = client(&server)
            .fetch_recent_candles("BTCUSDT", Granularity::OneMinute, 60)
            .await
            .unwrap();

        assert_eq!(snapshot.candles.len(), 60);
        assert_eq!(snapshot.candles[0].high, dec!(102));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_candles_error_code_is_unavailable() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", CANDLES_PATH)
            .match_query(Matcher::Any)
            .with_body(r#"{"code":"40019","msg":"Parameter granularity error","data":null}"#)
            .create_async()
            .await;

        let err = client(&server)
            .fetch_recent_candles("BTCUSDT", Granularity::OneMinute, 60)
            .await
            .unwrap_err();
        assert!(matches!(err, TradeError::DataUnavailable(_)));
    }

    #[tokio::test]
    async fn test_submit_order_payload() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", PLACE_ORDER_PATH)
            .match_header("access-sign", Matcher::Regex("^[0-9a-f]{64}$".into()))
            .match_body(Matcher::PartialJson(json!({
                "symbol": "BTCUSDT",
                "productType": "USDT-FUTURES",
                "marginMode": "isolated",
                "marginCoin": "USDT",
                "size": "0.2",
                "side": "buy",
                "orderType": "market",
                "clientOid": "oid-1",
                "presetStopSurplusPrice": "50500.00",
                "presetStopLossPrice": "49700.00"
            })))
            .with_body(ok_body(json!({"orderId": "121211212122", "clientOid": "oid-1"})))
            .create_async()
            .await;

        let response = client(&server).submit_order(&intent()).await.unwrap();

        assert!(response.is_success());
        assert_eq!(response.order_id.as_deref(), Some("121211212122"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_submit_order_returns_rejection_uninterpreted() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", PLACE_ORDER_PATH)
            .with_status(400)
            .with_body(r#"{"code":"40762","msg":"The order amount exceeds the balance","data":null}"#)
            .create_async()
            .await;

        let response = client(&server).submit_order(&intent()).await.unwrap();

        assert!(!response.is_success());
        assert_eq!(response.code, "40762");
        assert!(response.order_id.is_none());
    }

    #[tokio::test]
    async fn test_set_leverage_payload() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", SET_LEVERAGE_PATH)
            .match_body(Matcher::PartialJson(json!({
                "symbol": "BTCUSDT",
                "productType": "USDT-FUTURES",
                "marginCoin": "USDT",
                "leverage": "100",
                "holdSide": "short"
            })))
            .with_body(ok_body(json!({"symbol": "btcusdt", "longLeverage": "100"})))
            .create_async()
            .await;

        client(&server)
            .set_leverage("BTCUSDT", 100, Direction::Short)
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_order_status() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", ORDER_DETAIL_PATH)
            .match_query(Matcher::UrlEncoded("clientOid".into(), "oid-1".into()))
            .with_body(ok_body(json!({"orderId": "1", "clientOid": "oid-1", "state": "filled"})))
            .create_async()
            .await;

        let status = client(&server)
            .get_order_status("btcusdt", "oid-1")
            .await
            .unwrap();
        assert_eq!(status, OrderStatus::Filled);
    }

    #[tokio::test]
    async fn test_modify_requires_identifier() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", MODIFY_ORDER_PATH)
            .expect(0)
            .create_async()
            .await;

        let request = ModifyOrderRequest {
            symbol: "BTCUSDT".to_string(),
            product_type: "USDT-FUTURES".to_string(),
            order_id: None,
            client_oid: None,
            new_take_profit: "2000.00".to_string(),
            new_client_oid: None,
        };
        let err = client(&server).modify_order(&request).await.unwrap_err();

        assert!(matches!(err, TradeError::MissingOrderIdentifier));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_modify_take_profit() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", MODIFY_ORDER_PATH)
            .match_body(Matcher::PartialJson(json!({
                "symbol": "ETHUSDT",
                "productType": "usdt-futures",
                "clientOid": "oid-9",
                "newClientOid": "oid-10",
                "newPresetStopSurplusPrice": "2000.00"
            })))
            .with_body(ok_body(json!({"orderId": "77", "clientOid": "oid-10"})))
            .create_async()
            .await;

        let request = ModifyOrderRequest {
            symbol: "ETHUSDT".to_string(),
            product_type: "usdt-futures".to_string(),
            order_id: None,
            client_oid: Some("oid-9".to_string()),
            new_take_profit: "2000.00".to_string(),
            new_client_oid: Some("oid-10".to_string()),
        };
        let response = client(&server).modify_order(&request).await.unwrap();

        assert!(response.is_success());
        assert_eq!(response.order_id.as_deref(), Some("77"));
        assert_eq!(response.client_oid.as_deref(), Some("oid-10"));
        mock.assert_async().await;
    }
}
