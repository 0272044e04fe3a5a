use crate::engine::position::Trade;
use prettytable::{Cell, Row, Table};
use serde::{Deserialize, Serialize};

//aggregate statistics over the closed trades of a run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceSummary {
    pub num_trades: usize,
    pub num_winning_trades: usize,
    pub num_losing_trades: usize,
    pub total_profit_pct: f64,
    pub win_rate: f64,
    pub avg_profit_pct: f64,
    pub best_trade_pct: f64,
    pub worst_trade_pct: f64,
    pub avg_bars_held: f64,
}

impl PerformanceSummary {
    //aggregates the trade list; none distinguishes "no trades" from zero return
    pub fn from_trades(trades: &[Trade]) -> Option<Self> {
        if trades.is_empty() {
            return None;
        }

        let num_trades = trades.len();
        let num_winning_trades = trades.iter().filter(|t| t.profit_pct > 0.0).count();
        let num_losing_trades = trades.iter().filter(|t| t.profit_pct < 0.0).count();
        let total_profit_pct: f64 = trades.iter().map(|t| t.profit_pct).sum();
        let win_rate = num_winning_trades as f64 / num_trades as f64 * 100.0;

        let best_trade_pct = trades
            .iter()
            .map(|t| t.profit_pct)
            .fold(f64::NEG_INFINITY, f64::max);
        let worst_trade_pct = trades
            .iter()
            .map(|t| t.profit_pct)
            .fold(f64::INFINITY, f64::min);
        let avg_bars_held =
            trades.iter().map(|t| t.bars_held as f64).sum::<f64>() / num_trades as f64;

        Some(PerformanceSummary {
            num_trades,
            num_winning_trades,
            num_losing_trades,
            total_profit_pct,
            win_rate,
            avg_profit_pct: total_profit_pct / num_trades as f64,
            best_trade_pct,
            worst_trade_pct,
            avg_bars_held,
        })
    }

    //prints the three headline statistics
    pub fn print_headline(&self) {
        println!("Number of Trades: {}", self.num_trades);
        println!("Total Profit %: {:.2}%", self.total_profit_pct);
        println!("Win Rate: {:.1}%", self.win_rate);
    }

    //prints metrics in a formatted table
    pub fn pretty_print_table(&self) {
        let mut table = Table::new();

        table.add_row(Row::new(vec![Cell::new("Metric"), Cell::new("Value")]));

        table.add_row(Row::new(vec![
            Cell::new("Number of Trades"),
            Cell::new(&format!("{}", self.num_trades)),
        ]));

        table.add_row(Row::new(vec![
            Cell::new("Winning / Losing"),
            Cell::new(&format!(
                "{} / {}",
                self.num_winning_trades, self.num_losing_trades
            )),
        ]));

        table.add_row(Row::new(vec![
            Cell::new("Total Profit"),
            Cell::new(&format!("{:.2}%", self.total_profit_pct)),
        ]));

        table.add_row(Row::new(vec![
            Cell::new("Win Rate"),
            Cell::new(&format!("{:.1}%", self.win_rate)),
        ]));

        table.add_row(Row::new(vec![
            Cell::new("Avg Trade"),
            Cell::new(&format!("{:.2}%", self.avg_profit_pct)),
        ]));

        table.add_row(Row::new(vec![
            Cell::new("Best Trade"),
            Cell::new(&format!("{:.2}%", self.best_trade_pct)),
        ]));

        table.add_row(Row::new(vec![
            Cell::new("Worst Trade"),
            Cell::new(&format!("{:.2}%", self.worst_trade_pct)),
        ]));

        table.add_row(Row::new(vec![
            Cell::new("Avg Bars Held"),
            Cell::new(&format!("{:.1}", self.avg_bars_held)),
        ]));

        table.printstd();
    }
}
