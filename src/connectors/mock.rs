// src/connectors/mock.rs
//! In-memory exchange for engine and monitor tests.
use crate::connectors::messages::SUCCESS_CODE;
use crate::connectors::traits::ExchangeClient;
use crate::error::{TradeError, TradeResult};
use crate::types::{
    AccountBalance, Candle, Direction, Granularity, MarketSnapshot, ModifyOrderRequest,
    OrderIntent, OrderResponse, OrderStatus, SymbolPrecision,
};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

pub struct MockExchange {
    pub balance: Option<Decimal>,
    pub price: Decimal,
    pub precision: SymbolPrecision,
    /// Цена всех свечей окна: VWAP плоского окна равен ей.
    pub candle_price: Decimal,
    pub candle_count: usize,
    pub submit_code: String,
    pub(crate) statuses: Mutex<VecDeque<Option<OrderStatus>>>,
    pub(crate) submitted: Mutex<Vec<OrderIntent>>,
    pub(crate) balance_calls: AtomicUsize,
    pub(crate) price_calls: AtomicUsize,
    pub(crate) candle_calls: AtomicUsize,
    pub(crate) precision_calls: AtomicUsize,
    pub(crate) leverage_calls: AtomicUsize,
    pub(crate) submit_calls: AtomicUsize,
    pub(crate) status_calls: AtomicUsize,
}

impl Default for MockExchange {
    fn default() -> Self {
        Self {
            balance: Some(dec!(10000)),
            price: dec!(50000),
            precision: SymbolPrecision {
                price_precision: 1,
                size_precision: 3,
                size_multiplier: dec!(0.001),
                min_notional: dec!(5),
            },
            candle_price: dec!(50500),
            candle_count: 60,
            submit_code: SUCCESS_CODE.to_string(),
            statuses: Mutex::new(VecDeque::new()),
            submitted: Mutex::new(Vec::new()),
            balance_calls: AtomicUsize::new(0),
            price_calls: AtomicUsize::new(0),
            candle_calls: AtomicUsize::new(0),
            precision_calls: AtomicUsize::new(0),
            leverage_calls: AtomicUsize::new(0),
            submit_calls: AtomicUsize::new(0),
            status_calls: AtomicUsize::new(0),
        }
    }
}

impl MockExchange {
    /// `None` в очереди означает сбой транспорта на этом опросе.
    pub fn queue_statuses(&self, statuses: Vec<Option<OrderStatus>>) {
        self.statuses.lock().unwrap().extend(statuses);
    }

    pub fn submitted(&self) -> Vec<OrderIntent> {
        self.submitted.lock().unwrap().clone()
    }

    pub fn balance_calls(&self) -> usize {
        self.balance_calls.load(Ordering::SeqCst)
    }

    pub fn price_calls(&self) -> usize {
        self.price_calls.load(Ordering::SeqCst)
    }

    pub fn candle_calls(&self) -> usize {
        self.candle_calls.load(Ordering::SeqCst)
    }

    pub fn precision_calls(&self) -> usize {
        self.precision_calls.load(Ordering::SeqCst)
    }

    pub fn leverage_calls(&self) -> usize {
        self.leverage_calls.load(Ordering::SeqCst)
    }

    pub fn submit_calls(&self) -> usize {
        self.submit_calls.load(Ordering::SeqCst)
    }

    pub fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }

    pub fn network_calls(&self) -> usize {
        self.balance_calls()
            + self.price_calls()
            + self.candle_calls()
            + self.precision_calls()
            + self.leverage_calls()
            + self.submit_calls()
            + self.status_calls()
    }
}

#[async_trait]
impl ExchangeClient for MockExchange {
    async fn get_available_balance(&self) -> TradeResult<AccountBalance> {
        self.balance_calls.fetch_add(1, Ordering::SeqCst);
        self.balance
            .map(|available_quote| AccountBalance { available_quote })
            .ok_or_else(|| TradeError::BalanceUnavailable("mock".to_string()))
    }

    async fn fetch_recent_candles(
        &self,
        symbol: &str,
        _granularity: Granularity,
        _count: usize,
    ) -> TradeResult<MarketSnapshot> {
        self.candle_calls.fetch_add(1, Ordering::SeqCst);
        let now = Utc::now();
        let candles = (0..self.candle_count)
            .map(|i| Candle {
                timestamp: now - Duration::minutes((self.candle_count - 1 - i) as i64),
                open: self.candle_price,
                high: self.candle_price,
                low: self.candle_price,
                close: self.candle_price,
                volume: dec!(2),
            })
            .collect();
        Ok(MarketSnapshot {
            symbol: symbol.to_string(),
            candles,
            fetched_at: now,
        })
    }

    async fn fetch_last_price(&self, _symbol: &str) -> TradeResult<Decimal> {
        self.price_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.price)
    }

    async fn get_symbol_precision(&self, _symbol: &str) -> TradeResult<SymbolPrecision> {
        self.precision_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.precision)
    }

    async fn set_leverage(
        &self,
        _symbol: &str,
        _leverage: u32,
        _direction: Direction,
    ) -> TradeResult<()> {
        self.leverage_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn submit_order(&self, intent: &OrderIntent) -> TradeResult<OrderResponse> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        self.submitted.lock().unwrap().push(intent.clone());
        Ok(OrderResponse {
            code: self.submit_code.clone(),
            msg: if self.submit_code == SUCCESS_CODE {
                "success".to_string()
            } else {
                "rejected".to_string()
            },
            order_id: Some(format!("ex-{}", self.submit_calls())),
            client_oid: Some(intent.client_order_id.clone()),
        })
    }

    async fn get_order_status(&self, _symbol: &str, _client_oid: &str) -> TradeResult<OrderStatus> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        match self.statuses.lock().unwrap().pop_front() {
            Some(Some(status)) => Ok(status),
            Some(None) => Err(TradeError::Transport("connection reset".to_string())),
            None => Ok(OrderStatus::Open),
        }
    }

    async fn modify_order(&self, request: &ModifyOrderRequest) -> TradeResult<OrderResponse> {
        Ok(OrderResponse {
            code: SUCCESS_CODE.to_string(),
            msg: "success".to_string(),
            order_id: request.order_id.clone(),
            client_oid: request.new_client_oid.clone(),
        })
    }
}
