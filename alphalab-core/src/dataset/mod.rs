//! Dataset construction — sliding feature extraction with forward-return
//! targets, plus leakage-safe z-score normalization.

pub mod builder;
pub mod normalize;

pub use builder::{build_dataset, Dataset, DatasetRow, DatasetTable};
pub use normalize::NormalizationStats;
