//! Stochastic oscillator — %K and its d-period SMA %D.
//!
//! %K = 100 * (close - lowest_low) / (highest_high - lowest_low) over the
//! trailing k_period bars. Neutral default: k = d = 50.0 when fewer than
//! k_period bars exist, and for %K whenever the range is zero.

use serde::{Deserialize, Serialize};

use crate::domain::PriceBar;

/// Stochastic values at the last bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StochasticOutput {
    pub k: f64,
    pub d: f64,
}

/// %K at bar index `i` (inclusive window ending at `i`). Neutral 50.0 on a
/// zero high-low range.
fn percent_k(bars: &[PriceBar], i: usize, k_period: usize) -> f64 {
    let window = &bars[i + 1 - k_period..=i];
    let high_max = window.iter().map(|b| b.high).fold(f64::MIN, f64::max);
    let low_min = window.iter().map(|b| b.low).fold(f64::MAX, f64::min);
    let range = high_max - low_min;
    if range > 0.0 {
        100.0 * (bars[i].close - low_min) / range
    } else {
        50.0
    }
}

/// Stochastic oscillator over the trailing window.
pub fn stochastic(bars: &[PriceBar], k_period: usize, d_period: usize) -> StochasticOutput {
    if k_period == 0 || bars.len() < k_period {
        return StochasticOutput { k: 50.0, d: 50.0 };
    }

    let last = bars.len() - 1;
    let k = percent_k(bars, last, k_period);

    // %D: SMA of the last d_period %K values, as many as the window allows.
    let available = (last + 1 - k_period + 1).min(d_period.max(1));
    let sum: f64 = (0..available)
        .map(|back| percent_k(bars, last - back, k_period))
        .sum();
    let d = sum / available as f64;

    StochasticOutput { k, d }
}
