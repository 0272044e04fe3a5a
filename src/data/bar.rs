use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BarError {
    #[error("Invalid OHLC values: high ({high}) < low ({low})")]
    InvalidHighLow { high: f64, low: f64 },
    #[error("Invalid OHLC values: close ({close}) outside high-low range [{low}, {high}]")]
    InvalidClose { close: f64, high: f64, low: f64 },
    #[error("Invalid OHLC values: open ({open}) outside high-low range [{low}, {high}]")]
    InvalidOpen { open: f64, high: f64, low: f64 },
    #[error("Negative volume: {0}")]
    NegativeVolume(f64),
}

//represents a single ohlcv bar (candlestick) of market data
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    //creates a new Bar with validation
    pub fn new(
        timestamp: DateTime<Utc>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Result<Self, BarError> {
        //validate high >= low
        if high < low {
            return Err(BarError::InvalidHighLow { high, low });
        }

        //validate close within [low, high]
        if close < low || close > high {
            return Err(BarError::InvalidClose { close, high, low });
        }

        //validate open within [low, high]
        if open < low || open > high {
            return Err(BarError::InvalidOpen { open, high, low });
        }

        //validate non-negative volume
        if volume < 0.0 {
            return Err(BarError::NegativeVolume(volume));
        }

        Ok(Bar {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        })
    }

    //creates a Bar without validation
    pub fn new_unchecked(
        timestamp: DateTime<Utc>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Self {
        Bar {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    //returns the range (high - low)
    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    //true range against the previous bar's close
    pub fn true_range(&self, prev_close: f64) -> f64 {
        self.range()
            .max((self.high - prev_close).abs())
            .max((self.low - prev_close).abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn rejects_high_below_low() {
        let result = Bar::new(ts(), 100.0, 95.0, 105.0, 100.0, 0.0);
        assert!(matches!(result, Err(BarError::InvalidHighLow { .. })));
    }

    #[test]
    fn rejects_close_outside_range() {
        let result = Bar::new(ts(), 100.0, 105.0, 95.0, 110.0, 0.0);
        assert!(matches!(result, Err(BarError::InvalidClose { .. })));
    }

    #[test]
    fn rejects_negative_volume() {
        let result = Bar::new(ts(), 100.0, 105.0, 95.0, 100.0, -1.0);
        assert!(matches!(result, Err(BarError::NegativeVolume(_))));
    }

    #[test]
    fn true_range_uses_gap_from_prev_close() {
        let bar = Bar::new(ts(), 102.0, 104.0, 101.0, 103.0, 0.0).unwrap();
        //gap from a prev close of 98: |high - prev_close| = 6 beats the 3-point range
        assert_eq!(bar.true_range(98.0), 6.0);
        //no gap: plain high-low range
        assert_eq!(bar.true_range(102.0), 3.0);
    }
}
