//! Relative Strength Index (RSI).
//!
//! Wilder smoothing of average gains and average losses:
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss).
//! Neutral default: 50.0 when fewer than period+1 closes exist.
//! Edge case: avg_loss == 0 uses RS = 100 (RSI ≈ 99.01, saturating
//! toward 100 on a pure uptrend).

/// RSI at the last close over the trailing history.
pub fn rsi(closes: &[f64], period: usize) -> f64 {
    if period == 0 || closes.len() < period + 1 {
        return 50.0;
    }

    let mut gains = Vec::with_capacity(closes.len() - 1);
    let mut losses = Vec::with_capacity(closes.len() - 1);
    for w in closes.windows(2) {
        let delta = w[1] - w[0];
        gains.push(if delta > 0.0 { delta } else { 0.0 });
        losses.push(if delta < 0.0 { -delta } else { 0.0 });
    }

    // Seed: plain mean of the first `period` changes, then Wilder smoothing.
    let mut avg_gain = gains[..period].iter().sum::<f64>() / period as f64;
    let mut avg_loss = losses[..period].iter().sum::<f64>() / period as f64;
    for i in period..gains.len() {
        avg_gain = (avg_gain * (period as f64 - 1.0) + gains[i]) / period as f64;
        avg_loss = (avg_loss * (period as f64 - 1.0) + losses[i]) / period as f64;
    }

    let rs = if avg_loss != 0.0 {
        avg_gain / avg_loss
    } else {
        100.0
    };
    100.0 - 100.0 / (1.0 + rs)
}
