pub mod strategy_config;

pub use strategy_config::StrategyConfig;
