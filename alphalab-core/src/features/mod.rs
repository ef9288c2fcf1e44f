//! Feature extraction — one fixed-schema feature vector per as-of day.

pub mod extractor;

pub use extractor::{extract_features, MIN_HISTORY};
