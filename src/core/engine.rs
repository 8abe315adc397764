// src/core/engine.rs
use crate::config::AppConfig;
use crate::connectors::traits::ExchangeClient;
use crate::core::monitor::OrderMonitor;
use crate::core::positions::PositionCounters;
use crate::core::vwap::{calculate_vwap, VWAP_WINDOW};
use crate::error::{TradeError, TradeResult};
use crate::types::{Direction, OrderIntent, SubmittedOrder, SymbolPrecision, TradeSignal};
use crate::utils::precision::{round_to_places, truncate_to_places};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Доля доступного баланса на одну сделку.
pub const RISK_FRACTION: Decimal = dec!(0.01);
pub const LEVERAGE: u32 = 100;
/// Расстояние стоп-лосса от цены входа.
pub const STOP_LOSS_DISTANCE: Decimal = dec!(0.006);
/// Минимальный notional ордера в quote-валюте.
pub const MIN_NOTIONAL: Decimal = dec!(5);
/// Знаков после запятой у SL/TP.
pub const PROTECTIVE_PRICE_DECIMALS: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sizing {
    /// Цена, обрезанная до точности символа.
    pub price: Decimal,
    pub contracts: Decimal,
    pub notional: Decimal,
}

/// Баланс -> капитал (1%) -> объём с плечом -> контракты, обрезанные вниз.
pub fn size_order(
    available_quote: Decimal,
    last_price: Decimal,
    precision: &SymbolPrecision,
) -> TradeResult<Sizing> {
    let capital_to_use = available_quote * RISK_FRACTION;
    let order_value = capital_to_use * Decimal::from(LEVERAGE);

    let price = truncate_to_places(last_price, precision.price_precision);
    if price <= Decimal::ZERO || precision.size_multiplier <= Decimal::ZERO {
        return Err(TradeError::DataUnavailable(format!(
            "unusable price {} or size multiplier {}",
            price, precision.size_multiplier
        )));
    }

    let contracts_raw = order_value / price / precision.size_multiplier;
    let contracts = truncate_to_places(contracts_raw, precision.size_precision);

    let notional = contracts * precision.size_multiplier * price;
    let minimum = precision.min_notional.max(MIN_NOTIONAL);
    if notional < minimum {
        return Err(TradeError::BelowMinimumNotional { notional, minimum });
    }

    Ok(Sizing {
        price,
        contracts,
        notional,
    })
}

pub fn stop_loss_price(direction: Direction, entry: Decimal) -> Decimal {
    let raw = match direction {
        Direction::Long => entry * (Decimal::ONE - STOP_LOSS_DISTANCE),
        Direction::Short => entry * (Decimal::ONE + STOP_LOSS_DISTANCE),
    };
    round_to_places(raw, PROTECTIVE_PRICE_DECIMALS)
}

pub fn take_profit_price(vwap: Decimal) -> Decimal {
    round_to_places(vwap, PROTECTIVE_PRICE_DECIMALS)
}

pub struct TradingEngine {
    config: AppConfig,
    exchange: Arc<dyn ExchangeClient>,
    positions: PositionCounters,
    live_mode: bool,
}

impl TradingEngine {
    pub fn new(
        config: AppConfig,
        exchange: Arc<dyn ExchangeClient>,
        positions: PositionCounters,
    ) -> Self {
        let live_mode = config.live_trading;
        Self {
            config,
            exchange,
            positions,
            live_mode,
        }
    }

    #[cfg(test)]
    pub fn positions(&self) -> &PositionCounters {
        &self.positions
    }

    /// Обрабатывает сигналы по одному; ошибка сигнала не останавливает цикл.
    pub async fn run(&mut self, mut signals: mpsc::Receiver<TradeSignal>) -> anyhow::Result<()> {
        info!("Engine loop running. Live Mode: {}", self.live_mode);

        while let Some(signal) = signals.recv().await {
            match self.execute_signal(&signal).await {
                Ok(order) if order.live => self.spawn_monitor(&order),
                Ok(_) => {}
                Err(e) if e.is_policy() => warn!("Signal {} skipped: {}", signal.direction, e),
                Err(e) => error!("⚠️ Trade attempt for {} failed: {}", signal.direction, e),
            }
        }

        info!("Signal channel closed, engine stopping");
        Ok(())
    }

    fn spawn_monitor(&self, order: &SubmittedOrder) {
        let monitor = OrderMonitor::new(
            self.exchange.clone(),
            order.intent.symbol.clone(),
            &self.config.monitor,
        );
        let counters = self.positions.clone();
        let client_oid = order.intent.client_order_id.clone();
        let direction = order.direction;
        info!(
            "Watching order {:?} / {} (open: LONG {}, SHORT {})",
            order.exchange_order_id,
            client_oid,
            counters.count(Direction::Long),
            counters.count(Direction::Short)
        );

        tokio::spawn(async move {
            if let Err(e) = monitor
                .watch(&client_oid, direction, |d| counters.reset(d))
                .await
            {
                error!("Monitoring of {} stopped: {}", client_oid, e);
            }
        });
    }

    /// Gate -> balance -> sizing -> SL/TP -> submit. Counters change only
    /// after the exchange confirms the order.
    pub async fn execute_signal(&self, signal: &TradeSignal) -> TradeResult<SubmittedOrder> {
        let direction = signal.direction;
        let symbol = signal.symbol.as_str();
        info!("📨 Signal detected: {} {}", direction, symbol);
        if let Some(amount) = signal.amount {
            info!("Alert amount {} is informational; sizing uses balance", amount);
        }

        // 1. Лимит позиций: до любых сетевых вызовов
        if !self.positions.has_capacity(direction) {
            return Err(TradeError::PositionLimitReached(direction));
        }

        // 2. Баланс
        let balance = match self.exchange.get_available_balance().await {
            Ok(b) => b,
            Err(e) => {
                error!("Balance unavailable: {}", e);
                return Err(TradeError::NoBalance);
            }
        };
        if balance.available_quote <= Decimal::ZERO {
            return Err(TradeError::NoBalance);
        }
        info!("Available balance: {}", balance.available_quote);

        // 3-5. Точность, цена, объём, min notional
        let precision = self.exchange.get_symbol_precision(symbol).await?;
        let last_price = self.exchange.fetch_last_price(symbol).await?;
        let sizing = size_order(balance.available_quote, last_price, &precision)?;
        info!(
            "Sizing: {} contracts @ {} (notional {})",
            sizing.contracts, sizing.price, sizing.notional
        );

        // 6. Stop-loss
        let stop_loss = stop_loss_price(direction, sizing.price);

        // 7. Take-profit = VWAP, без поправки на направление
        let snapshot = self
            .exchange
            .fetch_recent_candles(symbol, self.config.granularity, VWAP_WINDOW)
            .await?;
        let vwap = calculate_vwap(&snapshot.candles)?;
        info!(
            "VWAP({}) for {} = {} (candles fetched at {})",
            VWAP_WINDOW, snapshot.symbol, vwap, snapshot.fetched_at
        );
        let take_profit = take_profit_price(vwap);
        let tp_on_losing_side = match direction {
            Direction::Long => take_profit <= sizing.price,
            Direction::Short => take_profit >= sizing.price,
        };
        if tp_on_losing_side {
            warn!(
                "Take-profit {} (VWAP) is not beyond entry {} for {}",
                take_profit, sizing.price, direction
            );
        }

        // 8. Ордер
        let intent = OrderIntent {
            symbol: symbol.to_string(),
            side: direction.side(),
            size_contracts: sizing.contracts,
            stop_loss,
            take_profit,
            client_order_id: Uuid::new_v4().to_string(),
        };

        if !self.live_mode {
            info!("📝 Paper order (not sent): {:?}", intent);
            return Ok(SubmittedOrder {
                direction,
                intent,
                exchange_order_id: None,
                live: false,
            });
        }

        if let Err(e) = self.exchange.set_leverage(symbol, LEVERAGE, direction).await {
            warn!("Set leverage {}x failed, proceeding: {}", LEVERAGE, e);
        }

        info!(
            "🚀 Sending {} {:?}: {} contracts, SL {}, TP {}",
            direction, intent.side, intent.size_contracts, stop_loss, take_profit
        );
        let response = self.exchange.submit_order(&intent).await?;
        if !response.is_success() {
            error!("Order rejected: {} {}", response.code, response.msg);
            return Err(TradeError::Api {
                code: response.code,
                msg: response.msg,
            });
        }

        // 9. Только после подтверждения
        let open = self.positions.increment(direction);
        info!(
            "✅ Order accepted: id {:?}, client oid {} ({} open {})",
            response.order_id, intent.client_order_id, open, direction
        );

        Ok(SubmittedOrder {
            direction,
            intent,
            exchange_order_id: response.order_id,
            live: true,
        })
    }
}
