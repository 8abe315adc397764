// src/config.rs

use crate::types::Granularity;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::fmt;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct MonitorConfig {
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    // Потолок числа опросов статуса ордера
    #[serde(default = "default_max_polls")]
    pub max_polls: u32,
}

impl MonitorConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval_secs(),
            max_polls: default_max_polls(),
        }
    }
}

#[derive(Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub secret_key: String,
    #[serde(default)]
    pub passphrase: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_symbol")]
    pub symbol: String,
    #[serde(default = "default_product_type")]
    pub product_type: String,
    #[serde(default = "default_margin_coin")]
    pub margin_coin: String,
    #[serde(default = "default_granularity")]
    pub granularity: Granularity,
    #[serde(default = "default_locale")]
    pub locale: String,
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
    // По умолчанию paper-режим
    #[serde(default)]
    pub live_trading: bool,
    #[serde(default)]
    pub monitor: MonitorConfig,
}

impl AppConfig {
    /// Settings.{toml,yaml,json} (необязательный) + переменные окружения APP_*.
    /// Вложенные ключи: APP_MONITOR__MAX_POLLS=60.
    pub fn new() -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(File::with_name("Settings").required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__"),
            );

        let config = builder.build()?;
        config.try_deserialize()
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

// Ключи не должны попадать в логи.
impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("secret_key", &redact(&self.secret_key))
            .field("passphrase", &redact(&self.passphrase))
            .field("base_url", &self.base_url)
            .field("symbol", &self.symbol)
            .field("product_type", &self.product_type)
            .field("margin_coin", &self.margin_coin)
            .field("granularity", &self.granularity)
            .field("locale", &self.locale)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("live_trading", &self.live_trading)
            .field("monitor", &self.monitor)
            .finish()
    }
}

fn redact(secret: &str) -> &'static str {
    if secret.is_empty() {
        "<unset>"
    } else {
        "<redacted>"
    }
}

fn default_base_url() -> String {
    "https://api.bitget.com".to_string()
}

fn default_symbol() -> String {
    "BTCUSDT".to_string()
}

fn default_product_type() -> String {
    "USDT-FUTURES".to_string()
}

fn default_margin_coin() -> String {
    "USDT".to_string()
}

fn default_granularity() -> Granularity {
    Granularity::OneMinute
}

fn default_locale() -> String {
    "en-US".to_string()
}

fn default_http_timeout_secs() -> u64 {
    10
}

fn default_poll_interval_secs() -> u64 {
    10
}

fn default_max_polls() -> u32 {
    360
}

#[cfg(test)]
pub(crate) fn test_config(base_url: &str) -> AppConfig {
    AppConfig {
        api_key: "key".to_string(),
        secret_key: "secret".to_string(),
        passphrase: "phrase".to_string(),
        base_url: base_url.to_string(),
        symbol: default_symbol(),
        product_type: default_product_type(),
        margin_coin: default_margin_coin(),
        granularity: default_granularity(),
        locale: default_locale(),
        http_timeout_secs: 5,
        live_trading: true,
        monitor: MonitorConfig {
            poll_interval_secs: 0,
            max_polls: 5,
        },
    }
}
