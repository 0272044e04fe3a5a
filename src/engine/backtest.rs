use crate::config::StrategyConfig;
use crate::data::Bar;
use crate::engine::position::{Direction, Position, Trade};
use crate::indicator::{compute_indicators, IndicatorRow};
use crate::metrics::PerformanceSummary;

//result of a backtest
#[derive(Debug, Clone)]
pub struct BacktestResult {
    //none when no trades were executed
    pub summary: Option<PerformanceSummary>,
    pub trades: Vec<Trade>,
}

//walks the annotated series once, holding at most one open position
pub struct BacktestEngine {
    config: StrategyConfig,
    bars: Vec<Bar>,
    rows: Vec<IndicatorRow>,
}

impl BacktestEngine {
    //creates an engine and computes indicators for the series
    pub fn new(config: StrategyConfig, bars: Vec<Bar>) -> Self {
        let rows = compute_indicators(&bars, config.period);
        BacktestEngine {
            config,
            bars,
            rows,
        }
    }

    //runs the backtest and collects closed trades
    pub fn run(&self) -> BacktestResult {
        let mut position: Option<Position> = None;
        let mut trades: Vec<Trade> = Vec::new();

        for i in self.config.period..self.bars.len() {
            let bar = &self.bars[i];
            let row = &self.rows[i];
            let price = bar.close;

            //bars with unusable adx are skipped outright, exits included
            if row.adx == 0.0 || row.adx.is_nan() || row.adx <= self.config.adx_floor {
                continue;
            }

            if let Some(open) = &position {
                if self.should_exit(open, i, price, row.adx) {
                    trades.push(open.close(price, bar.timestamp, i, row.adx));
                    position = None;
                }
            }

            if position.is_none() && row.adx >= self.config.adx_threshold {
                if let Some(direction) = self.entry_signal(i, price, row) {
                    position = Some(Position::open(
                        direction,
                        price,
                        bar.timestamp,
                        i,
                        row.adx,
                    ));
                }
            }
        }

        //a position still open at series end is force-closed on the final bar
        if let Some(open) = &position {
            let final_index = self.bars.len() - 1;
            let final_bar = &self.bars[final_index];
            trades.push(open.close(
                final_bar.close,
                final_bar.timestamp,
                final_index,
                self.rows[final_index].adx,
            ));
        }

        let summary = PerformanceSummary::from_trades(&trades);
        BacktestResult { summary, trades }
    }

    //exit rule: time stop, or profit/loss level with faded trend strength
    fn should_exit(&self, open: &Position, index: usize, price: f64, adx: f64) -> bool {
        let bars_held = index - open.entry_index;
        if bars_held >= self.config.max_holding_bars() {
            return true;
        }

        let profit_pct = open.direction.profit_pct(open.entry_price, price);
        let adx_faded = adx <= open.entry_adx * self.config.adx_fade_ratio;

        (profit_pct >= self.config.take_profit_pct && adx_faded)
            || (profit_pct <= self.config.stop_loss_pct && adx_faded)
    }

    //entry rule: wide di spread, calm volatility, dominant and rising di line,
    //and no sharp counter-move over the recent lookback
    fn entry_signal(&self, index: usize, price: f64, row: &IndicatorRow) -> Option<Direction> {
        let di_spread = (row.plus_di - row.minus_di).abs();
        if di_spread < self.config.di_spread_min {
            return None;
        }

        let volatility = if row.volatility.is_nan() {
            self.config.default_volatility
        } else {
            row.volatility
        };
        if volatility > self.config.max_volatility {
            return None;
        }

        let prev = &self.rows[index - 1];

        if row.plus_di > row.minus_di
            && row.plus_di >= self.config.entry_di_level
            && row.plus_di > prev.plus_di
            && self.trailing_return(index, price) >= -self.config.max_trend_drop
        {
            return Some(Direction::Long);
        }

        if row.minus_di > row.plus_di
            && row.minus_di >= self.config.entry_di_level
            && row.minus_di > prev.minus_di
            && self.trailing_return(index, price) <= self.config.max_trend_drop
        {
            return Some(Direction::Short);
        }

        None
    }

    //return over the last trend_lookback bars
    fn trailing_return(&self, index: usize, price: f64) -> f64 {
        match index.checked_sub(self.config.trend_lookback) {
            Some(base) => {
                let base_price = self.bars[base].close;
                (price - base_price) / base_price
            }
            None => 0.0,
        }
    }
}
