//! Williams %R — close position within the trailing high-low range.
//!
//! %R = -100 * (highest_high - close) / (highest_high - lowest_low),
//! so values run from 0 (close at the top) to -100 (close at the bottom).
//! Neutral default: -50.0 for insufficient history or a zero range.

use crate::domain::PriceBar;

/// Williams %R at the last bar over the trailing `period` bars.
pub fn williams_r(bars: &[PriceBar], period: usize) -> f64 {
    if period == 0 || bars.len() < period {
        return -50.0;
    }

    let window = &bars[bars.len() - period..];
    let highest = window.iter().map(|b| b.high).fold(f64::MIN, f64::max);
    let lowest = window.iter().map(|b| b.low).fold(f64::MAX, f64::min);
    let range = highest - lowest;
    if range <= 0.0 {
        return -50.0;
    }

    let close = bars[bars.len() - 1].close;
    (highest - close) / range * -100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_bars;

    #[test]
    fn williams_insufficient_history_is_neutral() {
        let bars = make_bars(&[100.0, 101.0]);
        assert_eq!(williams_r(&bars, 14), -50.0);
    }

    #[test]
    fn williams_rising_close_near_zero() {
        let closes: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
        let bars = make_bars(&closes);
        let value = williams_r(&bars, 14);
        assert!(value > -20.0, "%R was {value}");
    }

    #[test]
    fn williams_falling_close_near_minus_hundred() {
        let closes: Vec<f64> = (0..20).map(|i| 200.0 - i as f64).collect();
        let bars = make_bars(&closes);
        let value = williams_r(&bars, 14);
        assert!(value < -80.0, "%R was {value}");
    }

    #[test]
    fn williams_bounds() {
        let closes = vec![100.0, 108.0, 96.0, 112.0, 94.0, 110.0, 98.0, 105.0, 99.0, 103.0,
                          101.0, 107.0, 97.0, 104.0, 102.0];
        let bars = make_bars(&closes);
        let value = williams_r(&bars, 14);
        assert!((-100.0..=0.0).contains(&value));
    }
}
