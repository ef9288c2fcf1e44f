//! Dataset builder — slides the feature extractor across history.
//!
//! For each start index from `MIN_HISTORY` through
//! `len - horizon - 1` (inclusive), both the stock history and the
//! benchmark history are truncated at that index before extraction, so no
//! feature can see past its as-of date. The forward-return target is
//! `(close[t+h] - close[t]) / close[t]`.
//!
//! Per-row extraction is a pure function of a read-only history prefix, so
//! rows are computed on the rayon pool; collecting an ordered index range
//! restores chronological order in the output.

use chrono::NaiveDate;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::domain::{FeatureTable, FeatureVector, PriceBar};
use crate::error::CoreError;
use crate::features::{extract_features, MIN_HISTORY};

/// One training/evaluation row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetRow {
    pub features: FeatureVector,
    /// Forward return over the build horizon.
    pub target_return: f64,
    pub as_of_date: NaiveDate,
    /// Close price at the as-of date, for converting returns back to prices.
    pub reference_price: f64,
}

/// Chronologically ordered rows plus a count of rows dropped during
/// extraction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    pub rows: Vec<DatasetRow>,
    /// Rows whose feature extraction failed and were skipped.
    pub skipped_rows: usize,
}

/// Dense view of a dataset: feature matrix plus aligned target, date, and
/// reference-price columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetTable {
    pub features: FeatureTable,
    pub targets: Vec<f64>,
    pub dates: Vec<NaiveDate>,
    pub reference_prices: Vec<f64>,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Convert to the dense table form consumed by models.
    pub fn to_table(&self) -> DatasetTable {
        let vectors: Vec<FeatureVector> = self.rows.iter().map(|r| r.features.clone()).collect();
        DatasetTable {
            features: FeatureTable::from_vectors(&vectors),
            targets: self.rows.iter().map(|r| r.target_return).collect(),
            dates: self.rows.iter().map(|r| r.as_of_date).collect(),
            reference_prices: self.rows.iter().map(|r| r.reference_price).collect(),
        }
    }
}

/// Build a dataset from price history with a forward-return horizon.
///
/// Rows whose extraction fails are skipped and counted; an empty result
/// (history shorter than `MIN_HISTORY + horizon + 1`, or every row skipped)
/// is `CoreError::InsufficientHistory`.
pub fn build_dataset(
    history: &[PriceBar],
    horizon: usize,
    benchmark: Option<&[PriceBar]>,
) -> Result<Dataset, CoreError> {
    let needed = MIN_HISTORY + horizon + 1;
    if history.len() < needed {
        return Err(CoreError::InsufficientHistory {
            got: history.len(),
            need: needed,
        });
    }

    let last_start = history.len() - horizon - 1;
    let results: Vec<Option<DatasetRow>> = (MIN_HISTORY..=last_start)
        .into_par_iter()
        .map(|i| {
            let window = &history[..=i];
            let bench_window = benchmark.map(|b| &b[..b.len().min(i + 1)]);
            let features = extract_features(window, bench_window).ok()?;

            let current = history[i].close;
            if current == 0.0 {
                return None;
            }
            let future = history[i + horizon].close;
            Some(DatasetRow {
                features,
                target_return: (future - current) / current,
                as_of_date: history[i].date,
                reference_price: current,
            })
        })
        .collect();

    let mut dataset = Dataset::default();
    for row in results {
        match row {
            Some(row) => dataset.rows.push(row),
            None => dataset.skipped_rows += 1,
        }
    }

    if dataset.rows.is_empty() {
        return Err(CoreError::InsufficientHistory {
            got: history.len(),
            need: needed,
        });
    }
    Ok(dataset)
}
