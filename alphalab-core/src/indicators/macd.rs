//! Moving Average Convergence Divergence (MACD).
//!
//! macd = EMA(close, fast) - EMA(close, slow); signal = EMA(macd, signal);
//! histogram = macd - signal.
//! Neutral default: all zeros when fewer than slow+signal closes exist.

use serde::{Deserialize, Serialize};

use super::ema::ema_series;

/// MACD values at the last bar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MacdOutput {
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
}

impl MacdOutput {
    /// True when the output is the insufficient-history neutral default.
    pub fn is_neutral(&self) -> bool {
        self.macd == 0.0 && self.signal == 0.0 && self.histogram == 0.0
    }
}

/// MACD over the trailing close series.
pub fn macd(closes: &[f64], fast: usize, slow: usize, signal_span: usize) -> MacdOutput {
    if closes.len() < slow + signal_span {
        return MacdOutput::default();
    }

    let ema_fast = ema_series(closes, fast);
    let ema_slow = ema_series(closes, slow);
    let macd_line: Vec<f64> = ema_fast
        .iter()
        .zip(&ema_slow)
        .map(|(f, s)| f - s)
        .collect();
    let signal_line = ema_series(&macd_line, signal_span);

    let macd_val = *macd_line.last().unwrap_or(&0.0);
    let signal_val = *signal_line.last().unwrap_or(&0.0);
    MacdOutput {
        macd: macd_val,
        signal: signal_val,
        histogram: macd_val - signal_val,
    }
}
