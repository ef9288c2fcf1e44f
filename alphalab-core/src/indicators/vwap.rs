//! Volume Weighted Average Price (VWAP) over a trailing window.
//!
//! VWAP = sum(typical_price * volume) / sum(volume) over the trailing
//! `period` bars, typical price = (high + low + close) / 3.
//! Neutral default: the last close when history is insufficient or the
//! window's volume sums to zero (0.0 for empty input).

use crate::domain::PriceBar;

/// VWAP at the last bar.
pub fn vwap(bars: &[PriceBar], period: usize) -> f64 {
    let fallback = bars.last().map(|b| b.close).unwrap_or(0.0);
    if period == 0 || bars.len() < period {
        return fallback;
    }

    let window = &bars[bars.len() - period..];
    let volume_sum: f64 = window.iter().map(|b| b.volume).sum();
    if volume_sum <= 0.0 {
        return fallback;
    }

    let weighted: f64 = window
        .iter()
        .map(|b| (b.high + b.low + b.close) / 3.0 * b.volume)
        .sum();
    weighted / volume_sum
}
