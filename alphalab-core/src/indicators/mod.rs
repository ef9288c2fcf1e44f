//! Indicator library — pure "as of last bar" functions with neutral defaults.
//!
//! Every function takes a finite bar window (or a derived close/volume
//! series) plus a period, and returns a scalar or a small record describing
//! the indicator at the last bar. None of them allocate state or touch I/O.
//!
//! Insufficient history never raises and never propagates NaN: each
//! indicator documents a neutral default (RSI 50, stochastic 50/50,
//! Williams %R −50, zeros elsewhere) and returns it instead. Downstream
//! confidence and signal thresholds depend on these exact defaults.

pub mod adx;
pub mod atr;
pub mod bollinger;
pub mod cci;
pub mod ema;
pub mod macd;
pub mod obv;
pub mod rsi;
pub mod stochastic;
pub mod summary;
pub mod vwap;
pub mod williams_r;

pub use adx::{adx, AdxOutput};
pub use atr::{atr, true_range};
pub use bollinger::{bollinger, BandPosition, BollingerOutput};
pub use cci::cci;
pub use ema::{ema_last, ema_series, sma_last};
pub use macd::{macd, MacdOutput};
pub use obv::obv;
pub use rsi::rsi;
pub use stochastic::{stochastic, StochasticOutput};
pub use summary::{
    AdxTrend, IndicatorSignal, MovingAverages, OverallSignal, RelativePosition,
    TechnicalSummary, TrendSignal,
};
pub use vwap::vwap;
pub use williams_r::williams_r;

/// Create synthetic bars from close prices for testing.
///
/// Generates plausible OHLV: open = prev_close (or close for first bar),
/// high = max(open,close) + 1.0, low = min(open,close) - 1.0, volume = 1000.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<crate::domain::PriceBar> {
    use crate::domain::PriceBar;
    let base_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            let high = open.max(close) + 1.0;
            let low = open.min(close) - 1.0;
            PriceBar {
                date: base_date + chrono::Duration::days(i as i64),
                open,
                high,
                low,
                close,
                volume: 1000.0,
            }
        })
        .collect()
}

/// Create bars from explicit (open, high, low, close) tuples for testing.
#[cfg(test)]
pub fn make_ohlc_bars(data: &[(f64, f64, f64, f64)]) -> Vec<crate::domain::PriceBar> {
    use crate::domain::PriceBar;
    let base_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    data.iter()
        .enumerate()
        .map(|(i, &(open, high, low, close))| PriceBar {
            date: base_date + chrono::Duration::days(i as i64),
            open,
            high,
            low,
            close,
            volume: 1000.0,
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
