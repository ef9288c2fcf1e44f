//! Walk-forward validation — rolling train/test windows over a dataset.
//!
//! Windows advance by the test size: window w trains on rows
//! `[w*test .. w*test + train)` and evaluates on the following `test` rows,
//! so no window ever trains on its own evaluation slice. Each window fits
//! normalization statistics and a fresh model on its training rows only,
//! then backtests the evaluation rows; per-window simulation metrics are
//! aggregated as mean/std/min/max.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use alphalab_core::dataset::{DatasetTable, NormalizationStats};

use crate::backtest::{BacktestError, BacktestSimulator, SimulatorConfig};
use crate::ensemble::EnsembleModel;
use crate::metrics::SimMetrics;
use crate::predictor::ModelError;
use crate::split::slice_table;

/// Rolling-window sizes plus the simulator settings applied per window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalkForwardConfig {
    pub train_size: usize,
    pub test_size: usize,
    pub simulator: SimulatorConfig,
}

impl Default for WalkForwardConfig {
    fn default() -> Self {
        Self {
            train_size: 200,
            test_size: 50,
            simulator: SimulatorConfig::default(),
        }
    }
}

/// Mean/std/min/max of one metric across windows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricSummary {
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

impl MetricSummary {
    pub fn from_values(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::default();
        }
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        Self {
            mean,
            std: var.sqrt(),
            min: values.iter().copied().fold(f64::INFINITY, f64::min),
            max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        }
    }
}

/// One evaluated window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowResult {
    pub window_index: usize,
    /// Training rows `[train_start, train_end)`.
    pub train_start: usize,
    pub train_end: usize,
    /// Evaluation rows `[test_start, test_end)`.
    pub test_start: usize,
    pub test_end: usize,
    pub final_value: f64,
    pub metrics: SimMetrics,
}

/// Aggregated walk-forward outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalkForwardResult {
    pub windows: Vec<WindowResult>,
    pub total_return_pct: MetricSummary,
    pub sharpe_ratio: MetricSummary,
    pub max_drawdown_pct: MetricSummary,
    pub win_rate: MetricSummary,
    pub profit_factor: MetricSummary,
}

#[derive(Debug, Error)]
pub enum WalkForwardError {
    #[error("insufficient data: {rows} rows < one window of {need}")]
    InsufficientData { rows: usize, need: usize },
    #[error("model construction or fit failed on window {window}: {source}")]
    ModelFailed {
        window: usize,
        #[source]
        source: ModelError,
    },
    #[error("backtest failed on window {window}: {source}")]
    BacktestFailed {
        window: usize,
        #[source]
        source: BacktestError,
    },
}

/// Run rolling walk-forward validation. `make_model` builds an untrained
/// model for each window.
pub fn run_walk_forward<F>(
    table: &DatasetTable,
    config: &WalkForwardConfig,
    mut make_model: F,
) -> Result<WalkForwardResult, WalkForwardError>
where
    F: FnMut() -> Result<EnsembleModel, ModelError>,
{
    let rows = table.targets.len();
    let need = config.train_size + config.test_size;
    if rows < need {
        return Err(WalkForwardError::InsufficientData { rows, need });
    }

    let simulator = BacktestSimulator::new(config.simulator.clone());
    let mut windows = Vec::new();
    let mut window_index = 0;
    let mut start = 0;

    while start + need <= rows {
        let train_end = start + config.train_size;
        let test_end = train_end + config.test_size;

        let train = slice_table(table, start, train_end);
        let test = slice_table(table, train_end, test_end);

        let stats = NormalizationStats::fit(&train.features);
        let train_x = stats.apply_table(&train.features);
        let test_x = stats.apply_table(&test.features);

        let mut model = make_model().map_err(|source| WalkForwardError::ModelFailed {
            window: window_index,
            source,
        })?;
        model
            .fit(&train_x, &train.targets)
            .map_err(|source| WalkForwardError::ModelFailed {
                window: window_index,
                source,
            })?;

        let prices = window_prices(table, train_end, test_end);
        let report = simulator
            .run(&model, &test_x, &prices, &test.dates)
            .map_err(|source| WalkForwardError::BacktestFailed {
                window: window_index,
                source,
            })?;

        windows.push(WindowResult {
            window_index,
            train_start: start,
            train_end,
            test_start: train_end,
            test_end,
            final_value: report.final_value,
            metrics: report.metrics,
        });

        window_index += 1;
        start += config.test_size;
    }

    Ok(aggregate(windows))
}

/// Evaluation-slice prices plus the one trailing price that closes the last
/// position. When the slice ends at the table edge, the trailing price is
/// reconstructed from the final row's realized forward return.
fn window_prices(table: &DatasetTable, test_start: usize, test_end: usize) -> Vec<f64> {
    let mut prices = table.reference_prices[test_start..test_end].to_vec();
    let trailing = if test_end < table.reference_prices.len() {
        table.reference_prices[test_end]
    } else {
        table.reference_prices[test_end - 1] * (1.0 + table.targets[test_end - 1])
    };
    prices.push(trailing);
    prices
}

fn aggregate(windows: Vec<WindowResult>) -> WalkForwardResult {
    fn summary(windows: &[WindowResult], f: impl Fn(&SimMetrics) -> f64) -> MetricSummary {
        let values: Vec<f64> = windows.iter().map(|w| f(&w.metrics)).collect();
        MetricSummary::from_values(&values)
    }

    WalkForwardResult {
        total_return_pct: summary(&windows, |m| m.total_return_pct),
        sharpe_ratio: summary(&windows, |m| m.sharpe_ratio),
        max_drawdown_pct: summary(&windows, |m| m.max_drawdown_pct),
        win_rate: summary(&windows, |m| m.win_rate),
        profit_factor: summary(&windows, |m| m.profit_factor),
        windows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ensemble::test_support::MeanPredictor;
    use crate::ensemble::{EnsembleMember, REFERENCE_WEIGHTS};
    use crate::predictor::Predictor;
    use alphalab_core::domain::FeatureTable;
    use chrono::NaiveDate;

    fn table(n: usize) -> DatasetTable {
        let base = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
        DatasetTable {
            features: FeatureTable {
                columns: vec!["x".to_string()],
                rows: (0..n).map(|i| vec![(i % 7) as f64]).collect(),
            },
            // Steady 0.5% forward return, prices to match.
            targets: vec![0.005; n],
            dates: (0..n).map(|i| base + chrono::Duration::days(i as i64)).collect(),
            reference_prices: (0..n).map(|i| 100.0 * 1.005f64.powi(i as i32)).collect(),
        }
    }

    fn mean_model() -> Result<EnsembleModel, ModelError> {
        let members = REFERENCE_WEIGHTS
            .iter()
            .map(|&weight| EnsembleMember {
                predictor: Box::new(MeanPredictor::new(0.0)) as Box<dyn Predictor>,
                weight,
            })
            .collect();
        EnsembleModel::new(members)
    }

    #[test]
    fn too_few_rows_is_insufficient_data() {
        let result = run_walk_forward(&table(249), &WalkForwardConfig::default(), mean_model);
        assert!(matches!(
            result,
            Err(WalkForwardError::InsufficientData { rows: 249, need: 250 })
        ));
    }

    #[test]
    fn window_layout_never_trains_on_test_rows() {
        let result = run_walk_forward(&table(300), &WalkForwardConfig::default(), mean_model).unwrap();
        assert_eq!(result.windows.len(), 2);
        for w in &result.windows {
            assert_eq!(w.test_start, w.train_end);
            assert_eq!(w.train_end - w.train_start, 200);
            assert_eq!(w.test_end - w.test_start, 50);
        }
        assert_eq!(result.windows[1].train_start, 50);
    }

    #[test]
    fn steady_uptrend_profits_in_every_window() {
        let result = run_walk_forward(&table(350), &WalkForwardConfig::default(), mean_model).unwrap();
        assert_eq!(result.windows.len(), 3);
        for w in &result.windows {
            assert!(
                w.final_value > 10_000.0,
                "window {} final value {}",
                w.window_index,
                w.final_value
            );
        }
        assert!(result.total_return_pct.mean > 0.0);
        assert!(result.total_return_pct.min > 0.0);
    }

    #[test]
    fn metric_summary_from_values() {
        let s = MetricSummary::from_values(&[1.0, 2.0, 3.0]);
        assert!((s.mean - 2.0).abs() < 1e-12);
        assert!((s.std - (2.0f64 / 3.0).sqrt()).abs() < 1e-12);
        assert_eq!(s.min, 1.0);
        assert_eq!(s.max, 3.0);

        assert_eq!(MetricSummary::from_values(&[]), MetricSummary::default());
    }

    #[test]
    fn model_failure_names_the_window() {
        let result = run_walk_forward(&table(300), &WalkForwardConfig::default(), || {
            Err(ModelError::InvalidWeights { sum: 0.0 })
        });
        assert!(matches!(
            result,
            Err(WalkForwardError::ModelFailed { window: 0, .. })
        ));
    }
}
