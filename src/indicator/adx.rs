use crate::data::Bar;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

//window for the trailing std-dev of close-to-close returns
const VOLATILITY_WINDOW: usize = 5;

//per-bar indicator values aligned to the bar index
//fields hold 0 before the index where they become defined
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorRow {
    pub true_range: f64,
    pub plus_dm: f64,
    pub minus_dm: f64,
    pub atr: f64,
    pub plus_di: f64,
    pub minus_di: f64,
    pub dx: f64,
    pub adx: f64,
    pub price_change: f64,
    //nan until the rolling window has filled
    pub volatility: f64,
}

impl IndicatorRow {
    fn zeroed() -> Self {
        IndicatorRow {
            true_range: 0.0,
            plus_dm: 0.0,
            minus_dm: 0.0,
            atr: 0.0,
            plus_di: 0.0,
            minus_di: 0.0,
            dx: 0.0,
            adx: 0.0,
            price_change: 0.0,
            volatility: f64::NAN,
        }
    }
}

//computes atr, +di/-di, dx and adx over the series using wilder's smoothing
pub fn compute_indicators(bars: &[Bar], period: usize) -> Vec<IndicatorRow> {
    let n = bars.len();
    let mut rows: Vec<IndicatorRow> = vec![IndicatorRow::zeroed(); n];

    //a zero period has no seed window; leave every row at its sentinel
    if period == 0 {
        return rows;
    }

    //raw true range and directional movement (index 0 has no lookback)
    for i in 1..n {
        let prev = &bars[i - 1];
        let bar = &bars[i];

        rows[i].true_range = bar.true_range(prev.close);

        let up_move = bar.high - prev.high;
        let down_move = prev.low - bar.low;

        if up_move > down_move && up_move > 0.0 {
            rows[i].plus_dm = up_move;
        }
        if down_move > up_move && down_move > 0.0 {
            rows[i].minus_dm = down_move;
        }

        rows[i].price_change = (bar.close - prev.close) / prev.close;
    }

    //wilder smoothing of tr and dm, seeded with the arithmetic mean
    if period < n {
        let atr_seed = rows[1..=period].iter().map(|r| r.true_range).sum::<f64>() / period as f64;
        let mut plus_dm_smooth =
            rows[1..=period].iter().map(|r| r.plus_dm).sum::<f64>() / period as f64;
        let mut minus_dm_smooth =
            rows[1..=period].iter().map(|r| r.minus_dm).sum::<f64>() / period as f64;
        rows[period].atr = atr_seed;

        let weight = (period - 1) as f64;
        let divisor = period as f64;

        for i in period..n {
            if i > period {
                rows[i].atr = (rows[i - 1].atr * weight + rows[i].true_range) / divisor;
                plus_dm_smooth = (plus_dm_smooth * weight + rows[i].plus_dm) / divisor;
                minus_dm_smooth = (minus_dm_smooth * weight + rows[i].minus_dm) / divisor;
            }

            if rows[i].atr != 0.0 {
                rows[i].plus_di = plus_dm_smooth / rows[i].atr * 100.0;
                rows[i].minus_di = minus_dm_smooth / rows[i].atr * 100.0;
            }

            let di_sum = rows[i].plus_di + rows[i].minus_di;
            if di_sum != 0.0 {
                rows[i].dx = (rows[i].plus_di - rows[i].minus_di).abs() / di_sum * 100.0;
            }
        }
    }

    //adx seeds one full period after dx becomes defined
    let adx_start = period * 2 - 1;
    if adx_start < n {
        rows[adx_start].adx =
            rows[period..=adx_start].iter().map(|r| r.dx).sum::<f64>() / period as f64;

        for i in adx_start + 1..n {
            rows[i].adx = (rows[i - 1].adx * (period - 1) as f64 + rows[i].dx) / period as f64;
        }
    }

    //rolling sample std-dev of returns; windows touching the undefined
    //index-0 return are skipped, so the first value lands at index 5
    for i in VOLATILITY_WINDOW..n {
        let window: Vec<f64> = rows[i + 1 - VOLATILITY_WINDOW..=i]
            .iter()
            .map(|r| r.price_change)
            .collect();
        rows[i].volatility = window.std_dev();
    }

    rows
}
