//! Average True Range (ATR).
//!
//! True Range: max(high-low, |high-prev_close|, |low-prev_close|);
//! the first bar has no previous close and uses high-low.
//! ATR here is the simple moving average of the trailing `period` true
//! ranges — the feature pipeline's definition, where ATR only ever feeds
//! a price-normalized volatility feature.
//! Neutral default: 0.0 when fewer than `period` bars exist.

use crate::domain::PriceBar;

/// Compute the True Range series from bars.
///
/// TR[0] = high[0] - low[0] (no previous close).
/// TR[t] = max(high[t]-low[t], |high[t]-close[t-1]|, |low[t]-close[t-1]|).
pub fn true_range(bars: &[PriceBar]) -> Vec<f64> {
    let mut tr = Vec::with_capacity(bars.len());
    for (i, bar) in bars.iter().enumerate() {
        if i == 0 {
            tr.push(bar.high - bar.low);
        } else {
            let pc = bars[i - 1].close;
            tr.push(
                (bar.high - bar.low)
                    .max((bar.high - pc).abs())
                    .max((bar.low - pc).abs()),
            );
        }
    }
    tr
}

/// ATR at the last bar: mean of the trailing `period` true ranges.
pub fn atr(bars: &[PriceBar], period: usize) -> f64 {
    if period == 0 || bars.len() < period {
        return 0.0;
    }
    let tr = true_range(bars);
    let window = &tr[tr.len() - period..];
    window.iter().sum::<f64>() / period as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_ohlc_bars, DEFAULT_EPSILON};

    #[test]
    fn true_range_basic() {
        let bars = make_ohlc_bars(&[
            (100.0, 105.0, 95.0, 102.0),  // TR = 105-95 = 10
            (102.0, 108.0, 100.0, 106.0), // TR = max(8, |108-102|, |100-102|) = 8
            (106.0, 107.0, 98.0, 99.0),   // TR = max(9, |107-106|, |98-106|) = 9
        ]);
        let tr = true_range(&bars);
        assert_approx(tr[0], 10.0, DEFAULT_EPSILON);
        assert_approx(tr[1], 8.0, DEFAULT_EPSILON);
        assert_approx(tr[2], 9.0, DEFAULT_EPSILON);
    }

    #[test]
    fn true_range_gap_up() {
        // Gap up: prev close 100, current bar 110-115-108
        let bars = make_ohlc_bars(&[
            (98.0, 102.0, 97.0, 100.0),
            (110.0, 115.0, 108.0, 112.0), // TR = max(7, |115-100|, |108-100|) = 15
        ]);
        let tr = true_range(&bars);
        assert_approx(tr[1], 15.0, DEFAULT_EPSILON);
    }

    #[test]
    fn atr_is_mean_of_trailing_true_ranges() {
        let bars = make_ohlc_bars(&[
            (100.0, 105.0, 95.0, 102.0),  // TR = 10
            (102.0, 108.0, 100.0, 106.0), // TR = 8
            (106.0, 107.0, 98.0, 99.0),   // TR = 9
            (99.0, 103.0, 97.0, 101.0),   // TR = 6
        ]);
        // Trailing 3: mean(8, 9, 6)
        assert_approx(atr(&bars, 3), 23.0 / 3.0, DEFAULT_EPSILON);
    }

    #[test]
    fn atr_insufficient_history_is_zero() {
        let bars = make_ohlc_bars(&[(100.0, 105.0, 95.0, 102.0)]);
        assert_eq!(atr(&bars, 14), 0.0);
    }
}
