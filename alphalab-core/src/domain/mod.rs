//! Domain types shared across the pipeline.

pub mod bar;
pub mod features;

pub use bar::PriceBar;
pub use features::{FeatureTable, FeatureVector};
