pub mod engine;
pub mod market_data;
pub mod monitor;
pub mod positions;
pub mod vwap;
