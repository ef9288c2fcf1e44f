//! AlphaLab Core — deterministic feature pipeline for daily price bars.
//!
//! This crate contains the data-facing half of the prediction engine:
//! - Domain types (price bars, feature vectors, feature tables, datasets)
//! - Indicator library (pure "as of last bar" functions with neutral defaults)
//! - Feature extractor (~29 features in five groups over a 200-bar window)
//! - Dataset builder (sliding extraction + forward-return targets)
//! - Z-score normalization with leakage-safe reusable statistics
//!
//! No I/O happens here. Callers fetch and align price history themselves and
//! hand in ordered `PriceBar` slices; everything downstream is a pure function
//! of that input.

pub mod dataset;
pub mod domain;
pub mod error;
pub mod features;
pub mod indicators;

pub use dataset::{build_dataset, Dataset, DatasetRow, DatasetTable, NormalizationStats};
pub use domain::{FeatureTable, FeatureVector, PriceBar};
pub use error::CoreError;
pub use features::{extract_features, MIN_HISTORY};
