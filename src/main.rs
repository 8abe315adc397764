// src/main.rs
use crate::config::AppConfig;
use crate::connectors::bitget::BitgetClient;
use crate::connectors::traits::ExchangeClient;
use crate::core::engine::TradingEngine;
use crate::core::positions::PositionCounters;
use crate::signals::SignalSource;
use crate::types::ModifyOrderRequest;
use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use dotenvy::dotenv;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

mod config;
mod connectors;
mod core;
mod error;
mod signals;
mod types;
mod utils;

#[derive(Parser, Debug)]
#[command(name = "bitget_sniper", version, about = "Bitget USDT-futures signal executor")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Read LONG/SHORT alerts from stdin and trade them (default).
    Run,
    /// Change the take-profit of an existing order.
    ModifyTp(ModifyTpArgs),
}

#[derive(Args, Debug)]
struct ModifyTpArgs {
    #[arg(long, env = "APP_API_KEY", hide_env_values = true)]
    api_key: Option<String>,
    #[arg(long, env = "APP_SECRET_KEY", hide_env_values = true)]
    api_secret: Option<String>,
    #[arg(long, env = "APP_PASSPHRASE", hide_env_values = true)]
    passphrase: Option<String>,
    #[arg(long)]
    order_id: Option<String>,
    #[arg(long)]
    client_oid: Option<String>,
    /// Trading pair, e.g. ETHUSDT
    #[arg(long)]
    symbol: String,
    /// Product type, e.g. usdt-futures
    #[arg(long)]
    product_type: String,
    /// New take-profit price, e.g. 2000.00
    #[arg(long)]
    new_tp: String,
    #[arg(long)]
    new_client_oid: Option<String>,
}

fn init_tracing() -> WorkerGuard {
    let file_appender = tracing_appender::rolling::daily("logs", "sniper.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(file_writer),
        )
        .init();

    guard
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();
    let _guard = init_tracing();
    let cli = Cli::parse();

    let result = match cli.command.unwrap_or(Command::Run) {
        Command::Run => run().await,
        Command::ModifyTp(args) => return ExitCode::from(modify_tp(args).await),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Fatal Engine Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> anyhow::Result<()> {
    let config = AppConfig::new().context("failed to load configuration")?;

    println!("========================================");
    println!("       BITGET SNIPER - v{}", env!("CARGO_PKG_VERSION"));
    println!("========================================");
    println!("Target: {} ({})", config.symbol, config.product_type);
    println!(
        "Mode:   {}",
        if config.live_trading {
            "🚨 LIVE TRADING"
        } else {
            "📝 PAPER TRADING"
        }
    );
    println!("========================================");
    info!("Configuration: {:?}", config);

    let exchange: Arc<dyn ExchangeClient> = Arc::new(BitgetClient::new(&config)?);
    let (signal_tx, signal_rx) = mpsc::channel(100);

    let source = SignalSource::stdin(config.symbol.clone());
    tokio::spawn(async move {
        if let Err(e) = source.run(signal_tx).await {
            error!("Signal input failed: {}", e);
        }
    });

    let mut engine = TradingEngine::new(config, exchange, PositionCounters::new());

    tokio::select! {
        res = engine.run(signal_rx) => res,
        _ = tokio::signal::ctrl_c() => {
            warn!("Ctrl+C received, shutting down");
            Ok(())
        }
    }
}

/// Код выхода 1 без идентификатора ордера; иначе 0 с результатом или ошибкой в stdout.
async fn modify_tp(mut args: ModifyTpArgs) -> u8 {
    args.order_id = args.order_id.filter(|s| !s.trim().is_empty());
    args.client_oid = args.client_oid.filter(|s| !s.trim().is_empty());
    if args.order_id.is_none() && args.client_oid.is_none() {
        println!("Error: Either --order-id or --client-oid must be provided.");
        return 1;
    }

    let mut config = match AppConfig::new() {
        Ok(c) => c,
        Err(e) => {
            println!("Error: {}", e);
            return 0;
        }
    };
    if let Some(key) = args.api_key {
        config.api_key = key;
    }
    if let Some(secret) = args.api_secret {
        config.secret_key = secret;
    }
    if let Some(passphrase) = args.passphrase {
        config.passphrase = passphrase;
    }

    let request = ModifyOrderRequest {
        symbol: args.symbol,
        product_type: args.product_type,
        order_id: args.order_id,
        client_oid: args.client_oid,
        new_take_profit: args.new_tp,
        new_client_oid: args.new_client_oid,
    };

    let outcome = match BitgetClient::new(&config) {
        Ok(client) => client.modify_order(&request).await,
        Err(e) => Err(e),
    };

    match outcome {
        Ok(response) if response.is_success() => {
            println!("Order TP modified successfully.");
            println!("Order ID: {}", response.order_id.unwrap_or_default());
            println!("Client OID: {}", response.client_oid.unwrap_or_default());
        }
        Ok(response) => println!("API Error: {}", response.msg),
        Err(e) => println!("Error: {}", e),
    }
    0
}
