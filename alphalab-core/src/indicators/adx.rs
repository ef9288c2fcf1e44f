//! Average Directional Index (ADX) with +DI / -DI.
//!
//! Directional movement and true range are accumulated with Wilder's
//! running-sum smoothing (sum - sum/period + next). DX is reported directly
//! as ADX (single-pass variant; no second smoothing of the DX series).
//! Neutral default: all zeros when fewer than period+1 bars exist.

use serde::{Deserialize, Serialize};

use crate::domain::PriceBar;

/// ADX values at the last bar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AdxOutput {
    pub adx: f64,
    pub plus_di: f64,
    pub minus_di: f64,
}

/// ADX over the trailing window.
pub fn adx(bars: &[PriceBar], period: usize) -> AdxOutput {
    if period == 0 || bars.len() < period + 1 {
        return AdxOutput::default();
    }

    let n = bars.len() - 1;
    let mut tr = Vec::with_capacity(n);
    let mut plus_dm = Vec::with_capacity(n);
    let mut minus_dm = Vec::with_capacity(n);
    for i in 1..bars.len() {
        let h = bars[i].high;
        let l = bars[i].low;
        let pc = bars[i - 1].close;
        tr.push((h - l).max((h - pc).abs()).max((l - pc).abs()));

        let up_move = h - bars[i - 1].high;
        let down_move = bars[i - 1].low - l;
        plus_dm.push(if up_move > down_move { up_move.max(0.0) } else { 0.0 });
        minus_dm.push(if down_move > up_move { down_move.max(0.0) } else { 0.0 });
    }

    // Wilder running-sum smoothing seeded with the first `period` sums.
    let mut smooth_tr: f64 = tr[..period].iter().sum();
    let mut smooth_plus: f64 = plus_dm[..period].iter().sum();
    let mut smooth_minus: f64 = minus_dm[..period].iter().sum();
    for i in period..n {
        smooth_tr = smooth_tr - smooth_tr / period as f64 + tr[i];
        smooth_plus = smooth_plus - smooth_plus / period as f64 + plus_dm[i];
        smooth_minus = smooth_minus - smooth_minus / period as f64 + minus_dm[i];
    }

    let (plus_di, minus_di) = if smooth_tr > 0.0 {
        (
            smooth_plus / smooth_tr * 100.0,
            smooth_minus / smooth_tr * 100.0,
        )
    } else {
        (0.0, 0.0)
    };

    let di_sum = plus_di + minus_di;
    let adx = if di_sum > 0.0 {
        (plus_di - minus_di).abs() / di_sum * 100.0
    } else {
        0.0
    };

    AdxOutput {
        adx,
        plus_di,
        minus_di,
    }
}
