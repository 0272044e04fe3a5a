use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

//trade direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Long,
    Short,
}

impl Direction {
    //signed return percentage for a move from entry to current price
    pub fn profit_pct(&self, entry_price: f64, current_price: f64) -> f64 {
        match self {
            Direction::Long => (current_price - entry_price) / entry_price * 100.0,
            Direction::Short => (entry_price - current_price) / entry_price * 100.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Long => "long",
            Direction::Short => "short",
        }
    }
}

//an open position; at most one exists during a backtest run
#[derive(Debug, Clone)]
pub struct Position {
    pub direction: Direction,
    pub entry_price: f64,
    pub entry_time: DateTime<Utc>,
    pub entry_index: usize,
    pub entry_adx: f64,
}

impl Position {
    pub fn open(
        direction: Direction,
        entry_price: f64,
        entry_time: DateTime<Utc>,
        entry_index: usize,
        entry_adx: f64,
    ) -> Self {
        Position {
            direction,
            entry_price,
            entry_time,
            entry_index,
            entry_adx,
        }
    }

    //converts the position into a closed trade at the given bar
    pub fn close(
        &self,
        exit_price: f64,
        exit_time: DateTime<Utc>,
        exit_index: usize,
        exit_adx: f64,
    ) -> Trade {
        Trade {
            entry_time: self.entry_time,
            exit_time,
            entry_price: self.entry_price,
            exit_price,
            direction: self.direction,
            profit_pct: self.direction.profit_pct(self.entry_price, exit_price),
            bars_held: exit_index - self.entry_index,
            adx_entry: self.entry_adx,
            adx_exit: exit_adx,
        }
    }
}

//a completed round trip, immutable once recorded
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trade {
    pub entry_time: DateTime<Utc>,
    pub exit_time: DateTime<Utc>,
    pub entry_price: f64,
    pub exit_price: f64,
    pub direction: Direction,
    pub profit_pct: f64,
    pub bars_held: usize,
    pub adx_entry: f64,
    pub adx_exit: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn long_profit_is_positive_on_rise() {
        let pct = Direction::Long.profit_pct(100.0, 103.0);
        assert!((pct - 3.0).abs() < 1e-12);
    }

    #[test]
    fn short_profit_is_positive_on_fall() {
        let pct = Direction::Short.profit_pct(100.0, 97.0);
        assert!((pct - 3.0).abs() < 1e-12);
    }

    #[test]
    fn close_records_held_bars_and_profit() {
        let entry = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let exit = Utc.with_ymd_and_hms(2024, 1, 1, 5, 0, 0).unwrap();

        let position = Position::open(Direction::Short, 200.0, entry, 20, 31.0);
        let trade = position.close(190.0, exit, 30, 26.0);

        assert_eq!(trade.bars_held, 10);
        assert!((trade.profit_pct - 5.0).abs() < 1e-12);
        assert_eq!(trade.adx_entry, 31.0);
        assert_eq!(trade.adx_exit, 26.0);
    }
}
