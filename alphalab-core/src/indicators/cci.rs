//! Commodity Channel Index (CCI).
//!
//! CCI = (tp - SMA(tp, period)) / (0.015 * mean_deviation), where tp is the
//! typical price (high + low + close) / 3 and mean_deviation is the mean
//! absolute deviation of tp from its SMA over the window.
//! Neutral default: 0.0 for insufficient history or zero deviation.

use crate::domain::PriceBar;

/// Lambert's scaling constant.
const CCI_FACTOR: f64 = 0.015;

/// CCI at the last bar over the trailing `period` bars.
pub fn cci(bars: &[PriceBar], period: usize) -> f64 {
    if period == 0 || bars.len() < period {
        return 0.0;
    }

    let tp: Vec<f64> = bars[bars.len() - period..]
        .iter()
        .map(|b| (b.high + b.low + b.close) / 3.0)
        .collect();
    let sma = tp.iter().sum::<f64>() / period as f64;
    let mean_dev = tp.iter().map(|v| (v - sma).abs()).sum::<f64>() / period as f64;
    if mean_dev <= 0.0 {
        return 0.0;
    }

    let current = tp[tp.len() - 1];
    (current - sma) / (CCI_FACTOR * mean_dev)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_bars;

    #[test]
    fn cci_insufficient_history_is_zero() {
        let bars = make_bars(&[100.0, 101.0]);
        assert_eq!(cci(&bars, 20), 0.0);
    }

    #[test]
    fn cci_flat_series_is_zero() {
        let bars = crate::indicators::make_ohlc_bars(&vec![(100.0, 100.0, 100.0, 100.0); 25]);
        assert_eq!(cci(&bars, 20), 0.0);
    }

    #[test]
    fn cci_strong_rally_is_positive() {
        let mut closes = vec![100.0; 19];
        closes.push(115.0);
        let bars = make_bars(&closes);
        let value = cci(&bars, 20);
        assert!(value > 100.0, "CCI was {value}");
    }

    #[test]
    fn cci_strong_selloff_is_negative() {
        let mut closes = vec![100.0; 19];
        closes.push(85.0);
        let bars = make_bars(&closes);
        let value = cci(&bars, 20);
        assert!(value < -100.0, "CCI was {value}");
    }
}
