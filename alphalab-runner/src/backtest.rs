//! Long/flat trading simulation driven by ensemble predictions.
//!
//! The simulator replays a held-out feature table bar by bar. While flat it
//! enters on a sufficiently bullish prediction with enough confidence; while
//! long it evaluates exits in strict priority order: take-profit, stop-loss,
//! bearish reversal, time exit. Commission is charged on both sides. Any
//! position still open after the last decision bar is force-liquidated at
//! the trailing price, which is why `prices` carries exactly one more
//! element than the feature table has rows.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use alphalab_core::domain::FeatureTable;

use crate::ensemble::EnsembleModel;
use crate::metrics::SimMetrics;
use crate::predictor::ModelError;

/// Trading-rule and cost parameters. Defaults match the production policy
/// constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulatorConfig {
    pub initial_capital: f64,
    /// Per-side commission as a fraction of notional.
    pub commission_rate: f64,
    /// Minimum predicted return to open a long.
    pub entry_threshold: f64,
    /// Minimum model confidence to act on a signal.
    pub confidence_floor: f64,
    pub take_profit_pct: f64,
    pub stop_loss_pct: f64,
    /// Bars a position may be held before the time exit fires.
    pub max_hold_bars: usize,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            initial_capital: 10_000.0,
            commission_rate: 0.001,
            entry_threshold: 0.002,
            confidence_floor: 0.60,
            take_profit_pct: 0.02,
            stop_loss_pct: 0.015,
            max_hold_bars: 10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeAction {
    Buy,
    Sell,
}

/// Which exit rule closed a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitReason {
    TakeProfit,
    StopLoss,
    BearishSignal,
    TimeExit,
    FinalExit,
}

/// One ledger entry. `profit` and `reason` are present on sells only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub date: NaiveDate,
    pub action: TradeAction,
    pub price: f64,
    pub shares: f64,
    pub predicted_price: f64,
    pub confidence: f64,
    pub profit: Option<f64>,
    pub reason: Option<ExitReason>,
}

/// Complete record of one simulation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestReport {
    pub initial_capital: f64,
    pub final_value: f64,
    pub total_return_pct: f64,
    pub trades: Vec<Trade>,
    pub equity_curve: Vec<f64>,
    pub metrics: SimMetrics,
}

#[derive(Debug, Error)]
pub enum BacktestError {
    #[error("need {expected} prices for {rows} feature rows, got {prices}")]
    LengthMismatch {
        rows: usize,
        prices: usize,
        expected: usize,
    },
    #[error("need one date per feature row ({rows}), got {dates}")]
    DateMismatch { rows: usize, dates: usize },
    #[error(transparent)]
    Model(#[from] ModelError),
}

struct OpenPosition {
    shares: f64,
    entry_price: f64,
    entry_bar: usize,
}

/// Replays predictions through the long/flat state machine.
#[derive(Debug, Clone, Default)]
pub struct BacktestSimulator {
    pub config: SimulatorConfig,
}

impl BacktestSimulator {
    pub fn new(config: SimulatorConfig) -> Self {
        Self { config }
    }

    /// Run the simulation. `prices.len()` must be exactly one more than the
    /// number of feature rows; the trailing price closes the final position.
    pub fn run(
        &self,
        model: &EnsembleModel,
        features: &FeatureTable,
        prices: &[f64],
        dates: &[NaiveDate],
    ) -> Result<BacktestReport, BacktestError> {
        let n = features.n_rows();
        if prices.len() != n + 1 {
            return Err(BacktestError::LengthMismatch {
                rows: n,
                prices: prices.len(),
                expected: n + 1,
            });
        }
        if dates.len() != n {
            return Err(BacktestError::DateMismatch {
                rows: n,
                dates: dates.len(),
            });
        }

        let predictions = model.predict(features)?;
        let confidences = model.confidence(features)?;

        let cfg = &self.config;
        let mut cash = cfg.initial_capital;
        let mut position: Option<OpenPosition> = None;
        let mut trades: Vec<Trade> = Vec::new();
        let mut equity_curve = Vec::with_capacity(n + 1);

        for i in 0..n {
            let price = prices[i];
            let predicted = predictions[i];
            let confidence = confidences[i];

            match position.take() {
                Some(open) => {
                    let reason = self.exit_reason(&open, price, predicted, confidence, i);
                    match reason {
                        Some(reason) => {
                            let trade = self.close(&open, price, predicted, confidence, dates[i], reason);
                            cash += open.shares * price * (1.0 - cfg.commission_rate);
                            trades.push(trade);
                        }
                        None => position = Some(open),
                    }
                }
                None => {
                    if predicted > cfg.entry_threshold && confidence >= cfg.confidence_floor {
                        let cost_per_share = price * (1.0 + cfg.commission_rate);
                        let shares = cash / cost_per_share;
                        cash -= shares * cost_per_share;
                        trades.push(Trade {
                            date: dates[i],
                            action: TradeAction::Buy,
                            price,
                            shares,
                            predicted_price: price * (1.0 + predicted),
                            confidence,
                            profit: None,
                            reason: None,
                        });
                        position = Some(OpenPosition {
                            shares,
                            entry_price: price,
                            entry_bar: i,
                        });
                    }
                }
            }

            let held = position.as_ref().map_or(0.0, |p| p.shares);
            equity_curve.push(cash + held * price);
        }

        // Forced liquidation at the trailing price.
        if let Some(open) = position.take() {
            let price = prices[n];
            let trade = self.close(
                &open,
                price,
                *predictions.last().unwrap_or(&0.0),
                *confidences.last().unwrap_or(&0.0),
                dates[n - 1],
                ExitReason::FinalExit,
            );
            cash += open.shares * price * (1.0 - cfg.commission_rate);
            trades.push(trade);
        }

        let final_value = cash;
        equity_curve.push(final_value);

        let profits: Vec<f64> = trades.iter().filter_map(|t| t.profit).collect();
        let metrics = SimMetrics::compute(&equity_curve, &profits);

        Ok(BacktestReport {
            initial_capital: cfg.initial_capital,
            final_value,
            total_return_pct: (final_value / cfg.initial_capital - 1.0) * 100.0,
            trades,
            equity_curve,
            metrics,
        })
    }

    fn exit_reason(
        &self,
        open: &OpenPosition,
        price: f64,
        predicted: f64,
        confidence: f64,
        bar: usize,
    ) -> Option<ExitReason> {
        let cfg = &self.config;
        if price >= open.entry_price * (1.0 + cfg.take_profit_pct) {
            Some(ExitReason::TakeProfit)
        } else if price <= open.entry_price * (1.0 - cfg.stop_loss_pct) {
            Some(ExitReason::StopLoss)
        } else if predicted < -cfg.entry_threshold && confidence >= cfg.confidence_floor {
            Some(ExitReason::BearishSignal)
        } else if bar - open.entry_bar >= cfg.max_hold_bars {
            Some(ExitReason::TimeExit)
        } else {
            None
        }
    }

    fn close(
        &self,
        open: &OpenPosition,
        price: f64,
        predicted: f64,
        confidence: f64,
        date: NaiveDate,
        reason: ExitReason,
    ) -> Trade {
        let cfg = &self.config;
        let sell_price = price * (1.0 - cfg.commission_rate);
        let profit = open.shares * (sell_price - open.entry_price * (1.0 + cfg.commission_rate));
        Trade {
            date,
            action: TradeAction::Sell,
            price,
            shares: open.shares,
            predicted_price: price * (1.0 + predicted),
            confidence,
            profit: Some(profit),
            reason: Some(reason),
        }
    }
}
