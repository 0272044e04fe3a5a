pub mod backtest;
pub mod position;

pub use backtest::{BacktestEngine, BacktestResult};
pub use position::{Direction, Position, Trade};
