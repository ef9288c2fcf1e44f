//! On-Balance Volume (OBV) — cumulative signed volume.
//!
//! Volume is added on up-closes, subtracted on down-closes, ignored on
//! unchanged closes. The first bar contributes nothing (no previous close).
//! Neutral default: 0.0 for empty input.

use crate::domain::PriceBar;

/// OBV at the last bar.
pub fn obv(bars: &[PriceBar]) -> f64 {
    let mut total = 0.0;
    for w in bars.windows(2) {
        let delta = w[1].close - w[0].close;
        if delta > 0.0 {
            total += w[1].volume;
        } else if delta < 0.0 {
            total -= w[1].volume;
        }
    }
    total
}
