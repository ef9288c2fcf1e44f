//! Error taxonomy for the feature pipeline.
//!
//! Only genuinely unrecoverable conditions surface as errors. Degenerate
//! numeric input (zero variance, zero volume, zero denominators) is always
//! handled in place by substituting a documented neutral value, and NaN/Inf
//! sanitization happens at feature construction, so non-finite values never
//! cross the crate boundary.

use thiserror::Error;

/// Errors from feature extraction and dataset construction.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Not enough bars to extract features or build a dataset.
    #[error("insufficient history: {got} bars available, need at least {need}")]
    InsufficientHistory { got: usize, need: usize },
}
