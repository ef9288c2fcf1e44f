//! Z-score normalization with reusable, leakage-safe statistics.
//!
//! Statistics are fit exactly once, on the training slice, and then applied
//! verbatim to any later row set — including a single current-day feature
//! vector. They are never recomputed from the rows being normalized: that
//! would leak evaluation-period information into the transform and collapse
//! to a degenerate zero-variance normalization on single rows.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::{FeatureTable, FeatureVector};

/// Per-feature mean and standard deviation from a training slice.
///
/// A zero or NaN standard deviation is clamped to 1.0 so constant columns
/// pass through shifted but unscaled; a NaN mean becomes 0.0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizationStats {
    pub mean: BTreeMap<String, f64>,
    pub std: BTreeMap<String, f64>,
}

impl NormalizationStats {
    /// Fit per-column statistics over the given table (sample std, N-1).
    pub fn fit(table: &FeatureTable) -> Self {
        let mut stats = Self::default();
        let n = table.n_rows();
        for (col_idx, name) in table.columns.iter().enumerate() {
            let column: Vec<f64> = table.rows.iter().map(|r| r[col_idx]).collect();
            let mean = if n > 0 {
                column.iter().sum::<f64>() / n as f64
            } else {
                0.0
            };
            let std = if n > 1 {
                let var = column.iter().map(|v| (v - mean).powi(2)).sum::<f64>()
                    / (n as f64 - 1.0);
                var.sqrt()
            } else {
                0.0
            };

            let mean = if mean.is_finite() { mean } else { 0.0 };
            let std = if std.is_finite() && std != 0.0 { std } else { 1.0 };
            stats.mean.insert(name.clone(), mean);
            stats.std.insert(name.clone(), std);
        }
        stats
    }

    /// Normalize a full table with these statistics. Columns unseen at fit
    /// time pass through unchanged (mean 0, std 1).
    pub fn apply_table(&self, table: &FeatureTable) -> FeatureTable {
        let means: Vec<f64> = table
            .columns
            .iter()
            .map(|c| self.mean.get(c).copied().unwrap_or(0.0))
            .collect();
        let stds: Vec<f64> = table
            .columns
            .iter()
            .map(|c| self.std.get(c).copied().unwrap_or(1.0))
            .collect();
        let rows = table
            .rows
            .iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .map(|(i, v)| (v - means[i]) / stds[i])
                    .collect()
            })
            .collect();
        FeatureTable {
            columns: table.columns.clone(),
            rows,
        }
    }

    /// Normalize a single feature vector into the given column order —
    /// the path used for the current-day vector at prediction time.
    pub fn apply_vector(&self, vector: &FeatureVector, columns: &[String]) -> Vec<f64> {
        columns
            .iter()
            .map(|c| {
                let value = vector.get(c).unwrap_or(0.0);
                let mean = self.mean.get(c).copied().unwrap_or(0.0);
                let std = self.std.get(c).copied().unwrap_or(1.0);
                (value - mean) / std
            })
            .collect()
    }
}
