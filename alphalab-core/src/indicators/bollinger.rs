//! Bollinger Bands — SMA(close, period) ± k standard deviations.
//!
//! Uses sample standard deviation (divide by N-1), the convention the
//! feature pipeline's z-score constant was calibrated against.
//! Neutral default: all bands collapse onto the last close (bandwidth 0,
//! position Middle) when fewer than `period` closes exist.

use serde::{Deserialize, Serialize};

/// Where the last close sits relative to the bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BandPosition {
    Above,
    Middle,
    Below,
}

/// Bollinger Band values at the last bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BollingerOutput {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
    /// Band width as a percentage of the middle band.
    pub bandwidth: f64,
    pub position: BandPosition,
}

/// Sample standard deviation (N-1 denominator). 0.0 below two observations.
pub(crate) fn sample_std(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / n as f64;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n as f64 - 1.0);
    var.sqrt()
}

/// Bollinger Bands over the trailing `period` closes.
pub fn bollinger(closes: &[f64], period: usize, k: f64) -> BollingerOutput {
    let current = closes.last().copied().unwrap_or(0.0);
    if period == 0 || closes.len() < period {
        return BollingerOutput {
            upper: current,
            middle: current,
            lower: current,
            bandwidth: 0.0,
            position: BandPosition::Middle,
        };
    }

    let window = &closes[closes.len() - period..];
    let middle = window.iter().sum::<f64>() / period as f64;
    let std = sample_std(window);
    let upper = middle + k * std;
    let lower = middle - k * std;
    let bandwidth = if middle > 0.0 {
        (upper - lower) / middle * 100.0
    } else {
        0.0
    };

    let position = if current > upper {
        BandPosition::Above
    } else if current < lower {
        BandPosition::Below
    } else {
        BandPosition::Middle
    };

    BollingerOutput {
        upper,
        middle,
        lower,
        bandwidth,
        position,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn bollinger_insufficient_history_collapses() {
        let out = bollinger(&[100.0, 101.0], 20, 2.0);
        assert_eq!(out.upper, 101.0);
        assert_eq!(out.middle, 101.0);
        assert_eq!(out.lower, 101.0);
        assert_eq!(out.bandwidth, 0.0);
        assert_eq!(out.position, BandPosition::Middle);
    }

    #[test]
    fn bollinger_flat_series_has_zero_width() {
        let closes = vec![100.0; 25];
        let out = bollinger(&closes, 20, 2.0);
        assert_approx(out.upper, 100.0, DEFAULT_EPSILON);
        assert_approx(out.lower, 100.0, DEFAULT_EPSILON);
        assert_eq!(out.position, BandPosition::Middle);
    }

    #[test]
    fn bollinger_bands_are_symmetric() {
        let closes: Vec<f64> = (0..25).map(|i| 100.0 + (i % 5) as f64).collect();
        let out = bollinger(&closes, 20, 2.0);
        assert_approx(
            out.upper - out.middle,
            out.middle - out.lower,
            DEFAULT_EPSILON,
        );
        assert!(out.bandwidth > 0.0);
    }

    #[test]
    fn bollinger_detects_breakout_above() {
        // Stable window, then a final spike well above two sigmas.
        let mut closes: Vec<f64> = (0..24)
            .map(|i| 100.0 + if i % 2 == 0 { 0.5 } else { -0.5 })
            .collect();
        closes.push(120.0);
        let out = bollinger(&closes, 20, 2.0);
        assert_eq!(out.position, BandPosition::Above);
    }
}
