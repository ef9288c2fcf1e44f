//! FeatureVector and FeatureTable — sanitized numeric feature containers.
//!
//! The sanitization contract lives here: a `FeatureVector` never holds a
//! non-finite value. `insert` replaces NaN/Inf with 0.0, so nothing
//! downstream (normalization, models, simulator) ever sees one.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Named feature values for a single as-of date.
///
/// Backed by a `BTreeMap` so iteration order is deterministic (sorted by
/// feature name), which fixes the column order of every table built from it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    values: BTreeMap<String, f64>,
}

impl FeatureVector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a feature value, replacing NaN or infinite input with 0.0.
    pub fn insert(&mut self, name: impl Into<String>, value: f64) {
        let sanitized = if value.is_finite() { value } else { 0.0 };
        self.values.insert(name.into(), sanitized);
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    /// Feature names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(|s| s.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Dense feature matrix with a fixed, sorted column schema.
///
/// Built once from a list of `FeatureVector`s; every row shares the column
/// order of the first vector. Models consume this, never the map form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<f64>>,
}

impl FeatureTable {
    /// Build a table from feature vectors. Columns come from the first
    /// vector's sorted names; missing values in later rows default to 0.0.
    pub fn from_vectors(vectors: &[FeatureVector]) -> Self {
        let columns: Vec<String> = match vectors.first() {
            Some(first) => first.names().map(String::from).collect(),
            None => Vec::new(),
        };
        let rows = vectors
            .iter()
            .map(|v| columns.iter().map(|c| v.get(c).unwrap_or(0.0)).collect())
            .collect();
        Self { columns, rows }
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    /// Index of a named column, if present.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Borrow a contiguous row range as a new table (chronological slicing).
    pub fn slice(&self, start: usize, end: usize) -> Self {
        Self {
            columns: self.columns.clone(),
            rows: self.rows[start..end].to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_sanitizes_non_finite() {
        let mut fv = FeatureVector::new();
        fv.insert("a", f64::NAN);
        fv.insert("b", f64::INFINITY);
        fv.insert("c", f64::NEG_INFINITY);
        fv.insert("d", 1.5);
        assert_eq!(fv.get("a"), Some(0.0));
        assert_eq!(fv.get("b"), Some(0.0));
        assert_eq!(fv.get("c"), Some(0.0));
        assert_eq!(fv.get("d"), Some(1.5));
    }

    #[test]
    fn names_are_sorted() {
        let mut fv = FeatureVector::new();
        fv.insert("zeta", 1.0);
        fv.insert("alpha", 2.0);
        fv.insert("mid", 3.0);
        let names: Vec<&str> = fv.names().collect();
        assert_eq!(names, vec!["alpha", "mid", "zeta"]);
    }

    #[test]
    fn table_from_vectors_fixed_schema() {
        let mut a = FeatureVector::new();
        a.insert("x", 1.0);
        a.insert("y", 2.0);
        let mut b = FeatureVector::new();
        b.insert("y", 4.0);
        b.insert("x", 3.0);
        let table = FeatureTable::from_vectors(&[a, b]);
        assert_eq!(table.columns, vec!["x", "y"]);
        assert_eq!(table.rows, vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
    }

    #[test]
    fn table_from_empty_is_empty() {
        let table = FeatureTable::from_vectors(&[]);
        assert_eq!(table.n_rows(), 0);
        assert_eq!(table.n_cols(), 0);
    }

    #[test]
    fn table_slice_keeps_columns() {
        let mut a = FeatureVector::new();
        a.insert("x", 1.0);
        let mut b = FeatureVector::new();
        b.insert("x", 2.0);
        let mut c = FeatureVector::new();
        c.insert("x", 3.0);
        let table = FeatureTable::from_vectors(&[a, b, c]);
        let mid = table.slice(1, 3);
        assert_eq!(mid.n_rows(), 2);
        assert_eq!(mid.rows[0], vec![2.0]);
    }
}
