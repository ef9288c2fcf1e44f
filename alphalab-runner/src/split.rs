//! Chronological train/test splitting of dataset tables.
//!
//! Rows are never shuffled: the first `train_fraction` of rows becomes the
//! training slice and the remainder the evaluation slice, preserving the
//! time ordering the backtest depends on.

use alphalab_core::dataset::DatasetTable;
use alphalab_core::domain::FeatureTable;

/// Copy out the row range `[start, end)` of a table, bounds clamped.
pub(crate) fn slice_table(table: &DatasetTable, start: usize, end: usize) -> DatasetTable {
    let end = end.min(table.targets.len());
    let start = start.min(end);
    DatasetTable {
        features: FeatureTable {
            columns: table.features.columns.clone(),
            rows: table.features.rows[start..end].to_vec(),
        },
        targets: table.targets[start..end].to_vec(),
        dates: table.dates[start..end].to_vec(),
        reference_prices: table.reference_prices[start..end].to_vec(),
    }
}

/// Split a table at `floor(n_rows * train_fraction)` into (train, test).
///
/// The fraction is clamped to [0, 1]; either half may come out empty.
pub fn chronological_split(table: &DatasetTable, train_fraction: f64) -> (DatasetTable, DatasetTable) {
    let n = table.targets.len();
    let fraction = train_fraction.clamp(0.0, 1.0);
    let split = (n as f64 * fraction).floor() as usize;
    (slice_table(table, 0, split), slice_table(table, split, n))
}
