//! AlphaLab Runner — model combination, forecasting, and simulation.
//!
//! This crate builds on `alphalab-core` to provide:
//! - The abstract `Predictor` seam and prediction-quality metrics
//! - Fixed-weight `EnsembleModel` with agreement-based confidence
//! - Multi-step `HorizonForecaster` over the raw price series
//! - Long/flat `BacktestSimulator` with a trade ledger and equity curve
//! - Simulation performance metrics
//! - Rolling walk-forward validation and chronological splitting

pub mod backtest;
pub mod ensemble;
pub mod forecast;
pub mod metrics;
pub mod predictor;
pub mod split;
pub mod walk_forward;

pub use backtest::{
    BacktestError, BacktestReport, BacktestSimulator, ExitReason, SimulatorConfig, Trade,
    TradeAction,
};
pub use ensemble::{EnsembleMember, EnsembleModel, REFERENCE_WEIGHTS};
pub use forecast::{HorizonForecast, HorizonForecaster, PriceForecaster};
pub use metrics::SimMetrics;
pub use predictor::{evaluate_predictions, EvalMetrics, ModelError, Predictor, TrainMetrics};
pub use split::chronological_split;
pub use walk_forward::{
    run_walk_forward, MetricSummary, WalkForwardConfig, WalkForwardError, WalkForwardResult,
    WindowResult,
};
