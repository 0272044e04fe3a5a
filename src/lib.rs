//a Rust-based ADX trend-following strategy backtester

pub mod config;
pub mod data;
pub mod engine;
pub mod indicator;
pub mod metrics;

//prelude module for convenient imports
pub mod prelude {
    pub use crate::config::StrategyConfig;
    pub use crate::data::{load_csv, Bar};
    pub use crate::engine::{BacktestEngine, BacktestResult, Direction, Position, Trade};
    pub use crate::indicator::{compute_indicators, IndicatorRow};
    pub use crate::metrics::PerformanceSummary;
}
