//! Feature extractor — ~29 features in five groups from a trailing window.
//!
//! Input is the full bar history up to and including the as-of day, plus an
//! optional benchmark history aligned by the caller. A hard 200-bar floor
//! applies; the dataset builder's starting offset depends on it.
//!
//! Groups:
//! 1. Momentum — 1/5/21-day log returns, MACD line/signal/histogram
//! 2. Mean reversion — RSI + threshold flags, Bollinger z-score, price-to-EMA ratios
//! 3. Volatility — realized vol, normalized ATR and range, Parkinson, vol regime
//! 4. Liquidity — volume z-score/change/trend, turnover, VWAP deviation
//! 5. Relative strength — 21-day beta, market-residual return, RS spread
//!
//! Plus overnight gap, intraday return, and price-position-in-range.
//! Degenerate denominators always produce a neutral value, and the
//! `FeatureVector` sanitizes NaN/Inf to 0.0, so the output is always finite.

use crate::domain::bar::{closes, volumes};
use crate::domain::{FeatureVector, PriceBar};
use crate::error::CoreError;
use crate::indicators::bollinger::sample_std;
use crate::indicators::{atr, bollinger, ema_last, macd, rsi, sma_last, vwap};

/// Minimum bars of history required to extract features.
pub const MIN_HISTORY: usize = 200;

/// Trading days per year, used to annualize volatilities.
const ANNUALIZATION: f64 = 252.0;

/// Extract the feature vector for the last bar of `bars`.
///
/// `benchmark` must be truncated to the same as-of date by the caller; it is
/// only used when its length covers the stock window. Missing or degenerate
/// benchmark data yields beta = 1.0 and zero residual/relative-strength,
/// never an error.
pub fn extract_features(
    bars: &[PriceBar],
    benchmark: Option<&[PriceBar]>,
) -> Result<FeatureVector, CoreError> {
    if bars.len() < MIN_HISTORY {
        return Err(CoreError::InsufficientHistory {
            got: bars.len(),
            need: MIN_HISTORY,
        });
    }

    let close_series = closes(bars);
    let volume_series = volumes(bars);
    let current = &bars[bars.len() - 1];
    let returns = pct_returns(&close_series);

    let mut features = FeatureVector::new();
    momentum_features(&mut features, &close_series);
    mean_reversion_features(&mut features, &close_series, current);
    volatility_features(&mut features, bars, &returns, current);
    liquidity_features(&mut features, bars, &volume_series, current);
    relative_strength_features(&mut features, &close_series, &returns, benchmark);
    price_action_features(&mut features, bars, current);

    Ok(features)
}

/// Simple day-over-day returns; one element shorter than the close series.
fn pct_returns(close_series: &[f64]) -> Vec<f64> {
    close_series
        .windows(2)
        .map(|w| if w[0] != 0.0 { w[1] / w[0] - 1.0 } else { 0.0 })
        .collect()
}

/// Log return over `lag` bars ending at the last close; 0.0 when the window
/// does not fit or prices are non-positive.
fn log_return(close_series: &[f64], lag: usize) -> f64 {
    let n = close_series.len();
    if n <= lag {
        return 0.0;
    }
    let current = close_series[n - 1];
    let past = close_series[n - 1 - lag];
    if current > 0.0 && past > 0.0 {
        (current / past).ln()
    } else {
        0.0
    }
}

fn momentum_features(features: &mut FeatureVector, close_series: &[f64]) {
    features.insert("log_return_1d", log_return(close_series, 1));
    features.insert("log_return_5d", log_return(close_series, 5));
    features.insert("log_return_21d", log_return(close_series, 21));

    let macd_out = macd(close_series, 12, 26, 9);
    features.insert("macd_line", macd_out.macd);
    features.insert("macd_signal", macd_out.signal);
    features.insert("macd_histogram", macd_out.histogram);
}

fn mean_reversion_features(
    features: &mut FeatureVector,
    close_series: &[f64],
    current: &PriceBar,
) {
    let rsi_value = rsi(close_series, 14);
    features.insert("rsi", rsi_value);
    features.insert("rsi_oversold", if rsi_value < 30.0 { 1.0 } else { 0.0 });
    features.insert("rsi_overbought", if rsi_value > 70.0 { 1.0 } else { 0.0 });

    // Z-score against the mid-band: band width spans four standard
    // deviations, so a quarter width is one sigma.
    let bb = bollinger(close_series, 20, 2.0);
    let width = bb.upper - bb.lower;
    let bb_zscore = if width > 0.0 {
        (current.close - bb.middle) / (width / 4.0)
    } else {
        0.0
    };
    features.insert("bb_zscore", bb_zscore);

    let ema20 = ema_last(close_series, 20);
    let ema50 = ema_last(close_series, 50);
    features.insert(
        "price_to_ema20",
        if ema20 > 0.0 { current.close / ema20 - 1.0 } else { 0.0 },
    );
    features.insert(
        "price_to_ema50",
        if ema50 > 0.0 { current.close / ema50 - 1.0 } else { 0.0 },
    );
}

fn volatility_features(
    features: &mut FeatureVector,
    bars: &[PriceBar],
    returns: &[f64],
    current: &PriceBar,
) {
    features.insert("realized_vol_5d", trailing_vol(returns, 5));
    let vol_21d = trailing_vol(returns, 21);
    features.insert("realized_vol_21d", vol_21d);

    let atr_value = atr(bars, 14);
    features.insert(
        "atr_normalized",
        if current.close > 0.0 { atr_value / current.close } else { 0.0 },
    );
    features.insert(
        "hl_range_normalized",
        if current.close > 0.0 {
            (current.high - current.low) / current.close
        } else {
            0.0
        },
    );

    features.insert("parkinson_vol", parkinson_vol(bars, 20));

    // Vol regime: short-horizon vol relative to the 63-day baseline.
    let vol_63d = if returns.len() >= 63 {
        trailing_vol(returns, 63)
    } else {
        vol_21d
    };
    features.insert(
        "vol_regime",
        if vol_63d > 0.0 { vol_21d / vol_63d - 1.0 } else { 0.0 },
    );
}

/// Annualized sample std of the trailing `window` returns; 0.0 when the
/// window does not fit.
fn trailing_vol(returns: &[f64], window: usize) -> f64 {
    if returns.len() < window {
        return 0.0;
    }
    sample_std(&returns[returns.len() - window..]) * ANNUALIZATION.sqrt()
}

/// Parkinson range-based volatility estimator over a trailing window.
fn parkinson_vol(bars: &[PriceBar], window: usize) -> f64 {
    if bars.len() < window {
        return 0.0;
    }
    let tail = &bars[bars.len() - window..];
    let mean_sq = tail
        .iter()
        .map(|b| {
            if b.high > 0.0 && b.low > 0.0 {
                (b.high / b.low).ln().powi(2)
            } else {
                0.0
            }
        })
        .sum::<f64>()
        / window as f64;
    (mean_sq / (4.0 * 2.0_f64.ln())).sqrt() * ANNUALIZATION.sqrt()
}

fn liquidity_features(
    features: &mut FeatureVector,
    bars: &[PriceBar],
    volume_series: &[f64],
    current: &PriceBar,
) {
    let n = volume_series.len();

    let zscore = if n >= 20 {
        let tail = &volume_series[n - 20..];
        let mean = tail.iter().sum::<f64>() / 20.0;
        let std = sample_std(tail);
        if std > 0.0 { (current.volume - mean) / std } else { 0.0 }
    } else {
        0.0
    };
    features.insert("volume_zscore", zscore);

    let change = if n >= 2 && volume_series[n - 2] > 0.0 {
        current.volume / volume_series[n - 2] - 1.0
    } else {
        0.0
    };
    features.insert("volume_change", change);

    features.insert("turnover", current.volume * current.close);

    let vwap_value = vwap(bars, 20);
    features.insert(
        "vwap_deviation",
        if vwap_value > 0.0 { current.close / vwap_value - 1.0 } else { 0.0 },
    );

    let trend = match (sma_last(volume_series, 5), sma_last(volume_series, 20)) {
        (Some(short), Some(long)) if long > 0.0 => short / long - 1.0,
        _ => 0.0,
    };
    features.insert("volume_trend", trend);
}

/// Rolling-beta window for the relative strength group.
const BETA_WINDOW: usize = 21;

fn relative_strength_features(
    features: &mut FeatureVector,
    close_series: &[f64],
    returns: &[f64],
    benchmark: Option<&[PriceBar]>,
) {
    // Only use the benchmark when it covers the stock window; anything less
    // degrades to the neutral beta = 1.0 / zero-spread defaults.
    let bench = match benchmark {
        Some(b) if b.len() >= close_series.len() => b,
        _ => {
            features.insert("beta_to_benchmark", 1.0);
            features.insert("market_residual_return", 0.0);
            features.insert("relative_strength_vs_benchmark", 0.0);
            return;
        }
    };

    let bench_closes = closes(bench);
    let bench_returns = pct_returns(&bench_closes);

    let (beta, residual) = if returns.len() >= BETA_WINDOW && bench_returns.len() >= BETA_WINDOW {
        let stock_tail = &returns[returns.len() - BETA_WINDOW..];
        let bench_tail = &bench_returns[bench_returns.len() - BETA_WINDOW..];
        let beta = rolling_beta(stock_tail, bench_tail);
        let stock_r1 = returns[returns.len() - 1];
        let bench_r1 = bench_returns[bench_returns.len() - 1];
        (beta, stock_r1 - beta * bench_r1)
    } else {
        (1.0, 0.0)
    };
    features.insert("beta_to_benchmark", beta);
    features.insert("market_residual_return", residual);

    let spread = simple_return(close_series, 21) - simple_return(&bench_closes, 21);
    features.insert("relative_strength_vs_benchmark", spread);
}

/// Sample covariance / variance beta over paired return windows.
/// Degenerate benchmark variance yields the neutral beta of 1.0.
fn rolling_beta(stock: &[f64], bench: &[f64]) -> f64 {
    let n = stock.len();
    if n < 2 || n != bench.len() {
        return 1.0;
    }
    let stock_mean = stock.iter().sum::<f64>() / n as f64;
    let bench_mean = bench.iter().sum::<f64>() / n as f64;
    let mut cov = 0.0;
    let mut var = 0.0;
    for i in 0..n {
        let b = bench[i] - bench_mean;
        cov += (stock[i] - stock_mean) * b;
        var += b * b;
    }
    cov /= n as f64 - 1.0;
    var /= n as f64 - 1.0;
    if var > 0.0 {
        cov / var
    } else {
        1.0
    }
}

/// Simple return over `lag` bars ending at the last close; 0.0 when the
/// window does not fit.
fn simple_return(close_series: &[f64], lag: usize) -> f64 {
    let n = close_series.len();
    if n <= lag {
        return 0.0;
    }
    let past = close_series[n - 1 - lag];
    if past != 0.0 {
        close_series[n - 1] / past - 1.0
    } else {
        0.0
    }
}

fn price_action_features(features: &mut FeatureVector, bars: &[PriceBar], current: &PriceBar) {
    let n = bars.len();

    let gap = if n >= 2 && bars[n - 2].close > 0.0 {
        current.open / bars[n - 2].close - 1.0
    } else {
        0.0
    };
    features.insert("gap", gap);

    features.insert(
        "intraday_return",
        if current.open > 0.0 { current.close / current.open - 1.0 } else { 0.0 },
    );

    let range = current.high - current.low;
    features.insert(
        "price_position",
        if range > 0.0 { (current.close - current.low) / range } else { 0.5 },
    );
}
