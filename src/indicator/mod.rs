pub mod adx;

pub use adx::{compute_indicators, IndicatorRow};
