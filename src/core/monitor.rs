// src/core/monitor.rs
use crate::config::MonitorConfig;
use crate::connectors::traits::ExchangeClient;
use crate::error::{TradeError, TradeResult};
use crate::types::{Direction, OrderStatus};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MonitorState {
    Pending,
    Terminal(OrderStatus),
}

/// Опрашивает статус ордера по client order id, пока он не станет терминальным.
pub struct OrderMonitor {
    exchange: Arc<dyn ExchangeClient>,
    symbol: String,
    poll_interval: Duration,
    max_polls: u32,
}

impl OrderMonitor {
    pub fn new(exchange: Arc<dyn ExchangeClient>, symbol: String, config: &MonitorConfig) -> Self {
        Self {
            exchange,
            symbol,
            poll_interval: config.poll_interval(),
            max_polls: config.max_polls,
        }
    }

    /// Polls until a terminal status, then calls `on_terminal` once with the
    /// order's direction. Poll failures are logged and count towards
    /// `max_polls`; running out of polls yields `MonitorTimeout` and leaves
    /// the callback uncalled.
    pub async fn watch<F>(
        &self,
        client_oid: &str,
        direction: Direction,
        on_terminal: F,
    ) -> TradeResult<OrderStatus>
    where
        F: FnOnce(Direction),
    {
        info!("👀 Monitoring order {} ({})", client_oid, direction);
        let mut state = MonitorState::Pending;

        for poll in 1..=self.max_polls {
            match self.exchange.get_order_status(&self.symbol, client_oid).await {
                Ok(status) if status.is_terminal() => {
                    info!("✅ Order {} finished with status {:?}", client_oid, status);
                    state = MonitorState::Terminal(status);
                    break;
                }
                Ok(status) => {
                    info!(
                        "📊 Order {} status {:?} (poll {}/{})",
                        client_oid, status, poll, self.max_polls
                    );
                }
                Err(e) => {
                    warn!(
                        "Status poll for {} failed (poll {}/{}): {}",
                        client_oid, poll, self.max_polls, e
                    );
                }
            }

            if poll < self.max_polls {
                tokio::time::sleep(self.poll_interval).await;
            }
        }

        match state {
            MonitorState::Terminal(status) => {
                on_terminal(direction);
                Ok(status)
            }
            MonitorState::Pending => Err(TradeError::MonitorTimeout {
                client_oid: client_oid.to_string(),
                polls: self.max_polls,
            }),
        }
    }
}
