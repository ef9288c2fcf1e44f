//! Simulation performance metrics — pure functions over the equity curve
//! and the realized profits of closed trades.
//!
//! Everything degrades to a neutral value on empty input; no metric ever
//! errors. Annualization assumes 252 trading days.

use serde::{Deserialize, Serialize};

const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Sentinel for a profit factor with gross profit but zero gross loss.
pub const PROFIT_FACTOR_CAP: f64 = 999.0;

/// Aggregate risk and performance statistics for one simulation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimMetrics {
    pub total_return_pct: f64,
    pub annualized_return_pct: f64,
    pub sharpe_ratio: f64,
    pub max_drawdown_pct: f64,
    /// Fraction of closed trades with positive profit.
    pub win_rate: f64,
    pub profit_factor: f64,
    pub num_trades: usize,
    pub num_wins: usize,
    pub num_losses: usize,
    pub avg_win: f64,
    pub avg_loss: f64,
    pub expectancy: f64,
}

impl SimMetrics {
    /// Compute all metrics from an equity curve and the realized profits of
    /// closed trades.
    pub fn compute(equity_curve: &[f64], profits: &[f64]) -> Self {
        let num_wins = profits.iter().filter(|p| **p > 0.0).count();
        let num_losses = profits.iter().filter(|p| **p <= 0.0).count();
        let win_rate = win_rate(profits);
        let avg_win = avg_win(profits);
        let avg_loss = avg_loss(profits);
        Self {
            total_return_pct: total_return_pct(equity_curve),
            annualized_return_pct: annualized_return_pct(equity_curve),
            sharpe_ratio: sharpe_ratio(equity_curve),
            max_drawdown_pct: max_drawdown_pct(equity_curve),
            win_rate,
            profit_factor: profit_factor(profits),
            num_trades: profits.len(),
            num_wins,
            num_losses,
            avg_win,
            avg_loss,
            expectancy: win_rate * avg_win + (1.0 - win_rate) * avg_loss,
        }
    }
}

// ─── Equity-curve metrics ────────────────────────────────────────────

/// Total return in percent: (final / initial - 1) * 100.
pub fn total_return_pct(equity_curve: &[f64]) -> f64 {
    match (equity_curve.first(), equity_curve.last()) {
        (Some(&initial), Some(&final_eq)) if initial > 0.0 => {
            (final_eq / initial - 1.0) * 100.0
        }
        _ => 0.0,
    }
}

/// Geometric annualization over a 252-day year, in percent.
pub fn annualized_return_pct(equity_curve: &[f64]) -> f64 {
    let n = equity_curve.len();
    match (equity_curve.first(), equity_curve.last()) {
        (Some(&initial), Some(&final_eq)) if n >= 2 && initial > 0.0 && final_eq > 0.0 => {
            ((final_eq / initial).powf(TRADING_DAYS_PER_YEAR / n as f64) - 1.0) * 100.0
        }
        _ => 0.0,
    }
}

/// Annualized Sharpe ratio of daily equity returns (zero risk-free rate).
pub fn sharpe_ratio(equity_curve: &[f64]) -> f64 {
    if equity_curve.len() < 2 {
        return 0.0;
    }
    let returns: Vec<f64> = equity_curve
        .windows(2)
        .filter(|w| w[0] > 0.0)
        .map(|w| w[1] / w[0] - 1.0)
        .collect();
    if returns.is_empty() {
        return 0.0;
    }
    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let var = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;
    let std = var.sqrt();
    if std == 0.0 {
        return 0.0;
    }
    mean / std * TRADING_DAYS_PER_YEAR.sqrt()
}

/// Largest peak-to-trough decline, in percent of the peak.
pub fn max_drawdown_pct(equity_curve: &[f64]) -> f64 {
    let mut peak = f64::NEG_INFINITY;
    let mut worst: f64 = 0.0;
    for &value in equity_curve {
        peak = peak.max(value);
        if peak > 0.0 {
            worst = worst.max((peak - value) / peak * 100.0);
        }
    }
    worst
}

// ─── Trade-ledger metrics ────────────────────────────────────────────

/// Fraction of trades with positive profit.
pub fn win_rate(profits: &[f64]) -> f64 {
    if profits.is_empty() {
        return 0.0;
    }
    profits.iter().filter(|p| **p > 0.0).count() as f64 / profits.len() as f64
}

/// Gross profit over gross loss. 1.0 when both are zero; capped at 999.0
/// when losses are zero but profit is positive.
pub fn profit_factor(profits: &[f64]) -> f64 {
    let gross_profit: f64 = profits.iter().filter(|p| **p > 0.0).sum();
    let gross_loss: f64 = -profits.iter().filter(|p| **p < 0.0).sum::<f64>();
    if gross_loss == 0.0 {
        if gross_profit > 0.0 {
            PROFIT_FACTOR_CAP
        } else {
            1.0
        }
    } else {
        gross_profit / gross_loss
    }
}

/// Mean profit of winning trades; 0.0 with no wins.
pub fn avg_win(profits: &[f64]) -> f64 {
    let wins: Vec<f64> = profits.iter().copied().filter(|p| *p > 0.0).collect();
    if wins.is_empty() {
        return 0.0;
    }
    wins.iter().sum::<f64>() / wins.len() as f64
}

/// Mean profit of losing trades (a negative value); 0.0 with no losses.
pub fn avg_loss(profits: &[f64]) -> f64 {
    let losses: Vec<f64> = profits.iter().copied().filter(|p| *p <= 0.0).collect();
    if losses.is_empty() {
        return 0.0;
    }
    losses.iter().sum::<f64>() / losses.len() as f64
}
