use serde::{Deserialize, Serialize};
use std::path::Path;

//parameters of the adx trend-following strategy
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyConfig {
    //wilder smoothing period
    pub period: usize,

    //minimum adx for entries
    pub adx_threshold: f64,

    //bars at or below this adx level are skipped outright
    pub adx_floor: f64,

    //minimum level of the dominant di line at entry
    pub entry_di_level: f64,

    //minimum |+di - -di| spread at entry
    pub di_spread_min: f64,

    //volatility gate on entries
    pub max_volatility: f64,

    //substitute volatility when the rolling window has not filled
    pub default_volatility: f64,

    //take-profit and stop-loss return levels, in percent
    pub take_profit_pct: f64,
    pub stop_loss_pct: f64,

    //profit exits only fire once adx has faded to this fraction of its entry level
    pub adx_fade_ratio: f64,

    //time stop, expressed in trading days of bars_per_day bars
    pub max_holding_days: usize,
    pub bars_per_day: usize,

    //lookback for the trailing entry-trend filter
    pub trend_lookback: usize,

    //worst tolerated trailing return when entering with the trend
    pub max_trend_drop: f64,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        StrategyConfig {
            period: 14,
            adx_threshold: 25.0,
            adx_floor: 20.0,
            entry_di_level: 40.0,
            di_spread_min: 30.0,
            max_volatility: 0.05,
            default_volatility: 0.02,
            take_profit_pct: 1.5,
            stop_loss_pct: -0.5,
            adx_fade_ratio: 0.85,
            max_holding_days: 2,
            bars_per_day: 48,
            trend_lookback: 3,
            max_trend_drop: 0.08,
        }
    }
}

impl StrategyConfig {
    //maximum bars a position may stay open
    pub fn max_holding_bars(&self) -> usize {
        self.max_holding_days * self.bars_per_day
    }

    //minimum series length for the indicator seed windows
    pub fn min_bars(&self) -> usize {
        self.period * 2
    }

    //rejects parameter values the strategy cannot run with
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.period < 1 {
            anyhow::bail!("period must be at least 1, got {}", self.period);
        }
        if self.bars_per_day < 1 {
            anyhow::bail!("bars_per_day must be at least 1, got {}", self.bars_per_day);
        }
        Ok(())
    }

    //load configuration from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let config: StrategyConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    //save configuration to a JSON file
    pub fn to_json_file<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_time_stop_is_two_days_of_half_hour_bars() {
        let config = StrategyConfig::default();
        assert_eq!(config.max_holding_bars(), 96);
        assert_eq!(config.min_bars(), 28);
    }

    #[test]
    fn json_round_trip_preserves_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("strategy.json");

        let mut config = StrategyConfig::default();
        config.adx_threshold = 30.0;
        config.max_holding_days = 3;
        config.to_json_file(&path).unwrap();

        let loaded = StrategyConfig::from_json_file(&path).unwrap();
        assert_eq!(loaded.adx_threshold, 30.0);
        assert_eq!(loaded.max_holding_days, 3);
        assert_eq!(loaded.period, 14);
    }

    #[test]
    fn zero_period_is_rejected() {
        let mut config = StrategyConfig::default();
        config.period = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_period_json_fails_to_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("strategy.json");
        std::fs::write(&path, r#"{"period": 0}"#).unwrap();
        assert!(StrategyConfig::from_json_file(&path).is_err());
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: StrategyConfig = serde_json::from_str(r#"{"period": 10}"#).unwrap();
        assert_eq!(config.period, 10);
        assert_eq!(config.adx_threshold, 25.0);
    }
}
