//! Property tests for feature-pipeline invariants.
//!
//! Uses proptest to verify:
//! 1. Any 200-bar positive-price history extracts a fully finite vector
//! 2. Any shorter history fails with InsufficientHistory
//! 3. Normalization applied to its own fit rows yields mean ≈ 0, std ≈ 1
//! 4. Dataset rows always come out in chronological order

use proptest::prelude::*;

use alphalab_core::dataset::{build_dataset, NormalizationStats};
use alphalab_core::domain::PriceBar;
use alphalab_core::error::CoreError;
use alphalab_core::features::extract_features;

// ── Strategies ───────────────────────────────────────────────────────

fn arb_closes(len: usize) -> impl Strategy<Value = Vec<f64>> {
    proptest::collection::vec(10.0..500.0_f64, len)
}

fn bars_from_closes(closes: &[f64]) -> Vec<PriceBar> {
    let base_date = chrono::NaiveDate::from_ymd_opt(2020, 1, 2).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            PriceBar {
                date: base_date + chrono::Duration::days(i as i64),
                open,
                high: open.max(close) * 1.01,
                low: open.min(close) * 0.99,
                close,
                volume: 1_000.0 + (i % 97) as f64 * 10.0,
            }
        })
        .collect()
}

// ── 1. Finite features at exactly the history floor ──────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn two_hundred_bars_always_extract_finite_features(closes in arb_closes(200)) {
        let bars = bars_from_closes(&closes);
        let features = extract_features(&bars, None).unwrap();
        prop_assert!(features.len() >= 28);
        for (name, value) in features.iter() {
            prop_assert!(value.is_finite(), "feature {} not finite: {}", name, value);
        }
    }

    // ── 2. Short histories always fail ───────────────────────────────

    #[test]
    fn short_histories_fail_with_insufficient_history(
        len in 0usize..200,
    ) {
        let closes: Vec<f64> = (0..len).map(|i| 100.0 + i as f64).collect();
        let bars = bars_from_closes(&closes);
        let err = extract_features(&bars, None).unwrap_err();
        let is_expected_err =
            matches!(err, CoreError::InsufficientHistory { got, need: 200 } if got == len);
        prop_assert!(is_expected_err);
    }

    // ── 3. Self-normalization is standard ────────────────────────────

    #[test]
    fn normalization_standardizes_training_rows(closes in arb_closes(240)) {
        let bars = bars_from_closes(&closes);
        let table = build_dataset(&bars, 1, None).unwrap().to_table();
        let stats = NormalizationStats::fit(&table.features);
        let normalized = stats.apply_table(&table.features);

        let n = normalized.n_rows() as f64;
        for (col, name) in normalized.columns.iter().enumerate() {
            let values: Vec<f64> = normalized.rows.iter().map(|r| r[col]).collect();
            let mean = values.iter().sum::<f64>() / n;
            prop_assert!(mean.abs() < 1e-8, "column {} mean {}", name, mean);

            let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
            let std = var.sqrt();
            // Constant columns were fit with std clamped to 1: they stay at 0.
            prop_assert!(
                (std - 1.0).abs() < 1e-6 || std.abs() < 1e-9,
                "column {} std {}", name, std
            );
        }
    }

    // ── 4. Chronological ordering ────────────────────────────────────

    #[test]
    fn dataset_rows_are_chronological(closes in arb_closes(230)) {
        let bars = bars_from_closes(&closes);
        let dataset = build_dataset(&bars, 1, None).unwrap();
        for w in dataset.rows.windows(2) {
            prop_assert!(w[0].as_of_date < w[1].as_of_date);
        }
    }
}
