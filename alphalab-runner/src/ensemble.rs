//! Weighted ensemble over abstract return predictors.
//!
//! Members carry fixed combination weights (positive, summing to 1); the
//! ensemble prediction is the weighted sum of member predictions. Confidence
//! is derived from member disagreement: the per-row coefficient of variation
//! across members, inverted and clamped to [0.60, 0.95]. A near-zero mean
//! prediction pins CV at 1.0, so ambiguous rows bottom out at 0.60.

use std::collections::BTreeMap;

use alphalab_core::domain::FeatureTable;

use crate::predictor::{evaluate_predictions, ModelError, Predictor, TrainMetrics};

/// Reference member weights from the production configuration.
pub const REFERENCE_WEIGHTS: [f64; 4] = [0.20, 0.15, 0.35, 0.30];

const CONFIDENCE_FLOOR: f64 = 0.60;
const CONFIDENCE_CEILING: f64 = 0.95;
const NEAR_ZERO_MEAN: f64 = 0.01;
const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// One predictor plus its combination weight.
pub struct EnsembleMember {
    pub predictor: Box<dyn Predictor>,
    pub weight: f64,
}

/// A fixed-weight ensemble of return predictors.
pub struct EnsembleModel {
    members: Vec<EnsembleMember>,
    trained: bool,
}

impl EnsembleModel {
    /// Build an ensemble from weighted members. Weights must be positive
    /// and sum to 1 within tolerance.
    pub fn new(members: Vec<EnsembleMember>) -> Result<Self, ModelError> {
        let sum: f64 = members.iter().map(|m| m.weight).sum();
        if members.is_empty()
            || members.iter().any(|m| m.weight <= 0.0)
            || (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE
        {
            return Err(ModelError::InvalidWeights { sum });
        }
        Ok(Self {
            members,
            trained: false,
        })
    }

    pub fn is_trained(&self) -> bool {
        self.trained
    }

    pub fn n_members(&self) -> usize {
        self.members.len()
    }

    /// Fit every member on the training table and report training-set fit
    /// quality of the combined prediction.
    pub fn fit(&mut self, x: &FeatureTable, y: &[f64]) -> Result<TrainMetrics, ModelError> {
        if x.n_rows() == 0 || y.is_empty() {
            return Err(ModelError::EmptyTrainingSet);
        }
        if x.n_rows() != y.len() {
            return Err(ModelError::ShapeMismatch {
                rows: x.n_rows(),
                targets: y.len(),
            });
        }

        for member in &mut self.members {
            member.predictor.fit(x, y)?;
        }
        self.trained = true;

        let predictions = self.combine(x);
        let eval = evaluate_predictions(y, &predictions);
        Ok(TrainMetrics {
            mae: eval.mae,
            rmse: eval.rmse,
            r2: eval.r2,
            n_samples: x.n_rows(),
            n_features: x.n_cols(),
        })
    }

    /// Weighted-sum prediction for every row of `x`.
    pub fn predict(&self, x: &FeatureTable) -> Result<Vec<f64>, ModelError> {
        if !self.trained {
            return Err(ModelError::NotTrained);
        }
        Ok(self.combine(x))
    }

    /// Per-row confidence in [0.60, 0.95] from member agreement.
    pub fn confidence(&self, x: &FeatureTable) -> Result<Vec<f64>, ModelError> {
        if !self.trained {
            return Err(ModelError::NotTrained);
        }
        let member_predictions: Vec<Vec<f64>> = self
            .members
            .iter()
            .map(|m| m.predictor.predict(x))
            .collect();

        let n_members = self.members.len() as f64;
        let confidences = (0..x.n_rows())
            .map(|row| {
                let values: Vec<f64> = member_predictions.iter().map(|p| p[row]).collect();
                let mean = values.iter().sum::<f64>() / n_members;
                let cv = if mean.abs() <= NEAR_ZERO_MEAN {
                    1.0
                } else {
                    let var =
                        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n_members;
                    var.sqrt() / mean.abs()
                };
                (1.0 - cv).clamp(CONFIDENCE_FLOOR, CONFIDENCE_CEILING)
            })
            .collect();
        Ok(confidences)
    }

    /// Mean importance across members that expose importances, sorted
    /// descending. Empty before training or when no member reports them.
    pub fn feature_importance(&self) -> Vec<(String, f64)> {
        if !self.trained {
            return Vec::new();
        }
        let mut sums: BTreeMap<String, (f64, usize)> = BTreeMap::new();
        for member in &self.members {
            if let Some(importances) = member.predictor.feature_importances() {
                for (name, value) in importances {
                    let entry = sums.entry(name).or_insert((0.0, 0));
                    entry.0 += value;
                    entry.1 += 1;
                }
            }
        }
        let mut averaged: Vec<(String, f64)> = sums
            .into_iter()
            .map(|(name, (sum, count))| (name, sum / count as f64))
            .collect();
        averaged.sort_by(|a, b| b.1.total_cmp(&a.1));
        averaged
    }

    fn combine(&self, x: &FeatureTable) -> Vec<f64> {
        let mut combined = vec![0.0; x.n_rows()];
        for member in &self.members {
            let predictions = member.predictor.predict(x);
            for (out, p) in combined.iter_mut().zip(predictions) {
                *out += member.weight * p;
            }
        }
        combined
    }
}
