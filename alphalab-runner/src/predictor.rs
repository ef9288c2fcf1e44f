//! Predictor capability — the abstract seam between the ensemble and any
//! concrete regression algorithm.
//!
//! The ensemble never knows what its members are; it only asks them to fit
//! on a feature table and to score rows. Concrete learners (linear models,
//! tree ensembles, whatever the caller plugs in) live behind this trait.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use alphalab_core::domain::FeatureTable;

/// Errors from model training and inference.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model has not been trained yet")]
    NotTrained,
    #[error("empty training set")]
    EmptyTrainingSet,
    #[error("feature rows ({rows}) do not match targets ({targets})")]
    ShapeMismatch { rows: usize, targets: usize },
    #[error("ensemble weights must be positive and sum to 1, got sum {sum}")]
    InvalidWeights { sum: f64 },
    #[error("cannot fit a forecaster on an empty price series")]
    EmptyPriceSeries,
    #[error("member fit failed: {reason}")]
    MemberFitFailed { reason: String },
}

/// Training-set fit diagnostics reported by `EnsembleModel::fit`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainMetrics {
    pub mae: f64,
    pub rmse: f64,
    pub r2: f64,
    pub n_samples: usize,
    pub n_features: usize,
}

/// A single return-prediction model usable as an ensemble member.
///
/// `predict` on rows the model was not fit for is allowed to return anything
/// finite; the ensemble's confidence layer penalizes member disagreement.
pub trait Predictor: Send + Sync {
    fn fit(&mut self, x: &FeatureTable, y: &[f64]) -> Result<(), ModelError>;

    /// One predicted forward return per row of `x`.
    fn predict(&self, x: &FeatureTable) -> Vec<f64>;

    /// Per-feature importance scores, for members that expose them.
    fn feature_importances(&self) -> Option<BTreeMap<String, f64>> {
        None
    }
}

/// Held-out evaluation metrics for a prediction series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvalMetrics {
    pub mae: f64,
    pub rmse: f64,
    /// Mean absolute percentage error, in percent. Observations with a
    /// near-zero true value are excluded from the mean.
    pub mape: f64,
    pub r2: f64,
    /// Percentage of steps where predicted and realized changes agree in
    /// sign. 50.0 when fewer than two observations exist.
    pub directional_accuracy: f64,
}

/// Score predictions against realized values.
pub fn evaluate_predictions(y_true: &[f64], y_pred: &[f64]) -> EvalMetrics {
    let n = y_true.len().min(y_pred.len());
    if n == 0 {
        return EvalMetrics {
            mae: 0.0,
            rmse: 0.0,
            mape: 0.0,
            r2: 0.0,
            directional_accuracy: 50.0,
        };
    }
    let y_true = &y_true[..n];
    let y_pred = &y_pred[..n];

    let mae = y_true
        .iter()
        .zip(y_pred)
        .map(|(t, p)| (t - p).abs())
        .sum::<f64>()
        / n as f64;

    let mse = y_true
        .iter()
        .zip(y_pred)
        .map(|(t, p)| (t - p).powi(2))
        .sum::<f64>()
        / n as f64;
    let rmse = mse.sqrt();

    let mape_terms: Vec<f64> = y_true
        .iter()
        .zip(y_pred)
        .filter(|(t, _)| t.abs() > 1e-8)
        .map(|(t, p)| ((t - p) / t).abs() * 100.0)
        .collect();
    let mape = if mape_terms.is_empty() {
        0.0
    } else {
        mape_terms.iter().sum::<f64>() / mape_terms.len() as f64
    };

    let mean_true = y_true.iter().sum::<f64>() / n as f64;
    let ss_tot = y_true.iter().map(|t| (t - mean_true).powi(2)).sum::<f64>();
    let ss_res = y_true
        .iter()
        .zip(y_pred)
        .map(|(t, p)| (t - p).powi(2))
        .sum::<f64>();
    let r2 = if ss_tot == 0.0 { 0.0 } else { 1.0 - ss_res / ss_tot };

    let directional_accuracy = if n < 2 {
        50.0
    } else {
        let agree = y_true
            .windows(2)
            .zip(y_pred.windows(2))
            .filter(|(t, p)| (t[1] - t[0]).signum() == (p[1] - p[0]).signum())
            .count();
        agree as f64 / (n - 1) as f64 * 100.0
    };

    EvalMetrics {
        mae,
        rmse,
        mape,
        r2,
        directional_accuracy,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perfect_predictions_score_perfectly() {
        let y = [0.01, -0.02, 0.03, 0.005];
        let m = evaluate_predictions(&y, &y);
        assert_eq!(m.mae, 0.0);
        assert_eq!(m.rmse, 0.0);
        assert_eq!(m.mape, 0.0);
        assert_eq!(m.r2, 1.0);
        assert_eq!(m.directional_accuracy, 100.0);
    }

    #[test]
    fn constant_truth_has_zero_r2() {
        let y_true = [0.5, 0.5, 0.5];
        let y_pred = [0.4, 0.5, 0.6];
        let m = evaluate_predictions(&y_true, &y_pred);
        assert_eq!(m.r2, 0.0);
    }

    #[test]
    fn single_observation_directional_accuracy_is_neutral() {
        let m = evaluate_predictions(&[0.01], &[0.02]);
        assert_eq!(m.directional_accuracy, 50.0);
    }

    #[test]
    fn mape_skips_near_zero_truths() {
        let y_true = [0.0, 1.0];
        let y_pred = [0.5, 1.1];
        let m = evaluate_predictions(&y_true, &y_pred);
        // Only the second pair contributes: |0.1 / 1.0| * 100.
        assert!((m.mape - 10.0).abs() < 1e-9);
    }

    #[test]
    fn anti_correlated_predictions_have_zero_directional_accuracy() {
        let y_true = [0.0, 1.0, 0.0, 1.0];
        let y_pred = [1.0, 0.0, 1.0, 0.0];
        let m = evaluate_predictions(&y_true, &y_pred);
        assert_eq!(m.directional_accuracy, 0.0);
    }

    #[test]
    fn empty_input_is_neutral() {
        let m = evaluate_predictions(&[], &[]);
        assert_eq!(m.mae, 0.0);
        assert_eq!(m.directional_accuracy, 50.0);
    }
}
