//! Moving average primitives: EMA series/last and SMA over a trailing window.
//!
//! EMA uses alpha = 2 / (span + 1), seeded at the first observation
//! (matching the recursive pandas `ewm(adjust=False)` definition the rest
//! of the pipeline's constants were tuned against).

/// Exponential moving average over the full series.
///
/// Returns an empty vec for empty input. `ema[0] = values[0]`,
/// `ema[t] = alpha * values[t] + (1 - alpha) * ema[t-1]`.
pub fn ema_series(values: &[f64], span: usize) -> Vec<f64> {
    if values.is_empty() || span == 0 {
        return Vec::new();
    }
    let alpha = 2.0 / (span as f64 + 1.0);
    let mut out = Vec::with_capacity(values.len());
    let mut prev = values[0];
    out.push(prev);
    for &v in &values[1..] {
        prev = alpha * v + (1.0 - alpha) * prev;
        out.push(prev);
    }
    out
}

/// EMA at the last observation. Returns 0.0 for empty input.
pub fn ema_last(values: &[f64], span: usize) -> f64 {
    ema_series(values, span).last().copied().unwrap_or(0.0)
}

/// Simple moving average over the trailing `period` observations.
/// Returns `None` when fewer than `period` observations exist.
pub fn sma_last(values: &[f64], period: usize) -> Option<f64> {
    if period == 0 || values.len() < period {
        return None;
    }
    let window = &values[values.len() - period..];
    Some(window.iter().sum::<f64>() / period as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn ema_seeds_at_first_value() {
        let series = ema_series(&[10.0, 10.0, 10.0], 5);
        assert_approx(series[0], 10.0, DEFAULT_EPSILON);
        assert_approx(series[2], 10.0, DEFAULT_EPSILON);
    }

    #[test]
    fn ema_recursion() {
        // span=3 → alpha=0.5
        let series = ema_series(&[2.0, 4.0, 8.0], 3);
        assert_approx(series[1], 3.0, DEFAULT_EPSILON);
        assert_approx(series[2], 5.5, DEFAULT_EPSILON);
        assert_approx(ema_last(&[2.0, 4.0, 8.0], 3), 5.5, DEFAULT_EPSILON);
    }

    #[test]
    fn ema_empty_input() {
        assert!(ema_series(&[], 5).is_empty());
        assert_eq!(ema_last(&[], 5), 0.0);
    }

    #[test]
    fn sma_trailing_window() {
        assert_eq!(sma_last(&[1.0, 2.0, 3.0, 4.0], 2), Some(3.5));
        assert_eq!(sma_last(&[1.0], 2), None);
    }
}
