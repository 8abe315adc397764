use crate::error::TradeResult;
use crate::types::{
    AccountBalance, Direction, Granularity, MarketSnapshot, ModifyOrderRequest, OrderIntent, OrderResponse,
    OrderStatus, SymbolPrecision,
};
use async_trait::async_trait;
use rust_decimal::Decimal;

#[async_trait]
pub trait ExchangeClient: Send + Sync {
    async fn get_available_balance(&self) -> TradeResult<AccountBalance>;

    async fn fetch_recent_candles(
        &self,
        symbol: &str,
        granularity: Granularity,
        count: usize,
    ) -> TradeResult<MarketSnapshot>;

    async fn fetch_last_price(&self, symbol: &str) -> TradeResult<Decimal>;

    async fn get_symbol_precision(&self, symbol: &str) -> TradeResult<SymbolPrecision>;

    /// Isolated margin: leverage is set per hold side.
    async fn set_leverage(
        &self,
        symbol: &str,
        leverage: u32,
        direction: Direction,
    ) -> TradeResult<()>;

    // Returns the decoded response; the caller checks the embedded code.
    async fn submit_order(&self, intent: &OrderIntent) -> TradeResult<OrderResponse>;

    async fn get_order_status(&self, symbol: &str, client_oid: &str) -> TradeResult<OrderStatus>;

    async fn modify_order(&self, request: &ModifyOrderRequest) -> TradeResult<OrderResponse>;
}
