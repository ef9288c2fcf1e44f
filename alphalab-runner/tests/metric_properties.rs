//! Property tests for metric bounds.
//!
//! Metrics are pure functions that must stay inside their documented ranges
//! for any input, including pathological equity curves and trade ledgers.

use proptest::prelude::*;

use alphalab_runner::metrics::{
    avg_loss, avg_win, max_drawdown_pct, profit_factor, sharpe_ratio, win_rate,
};
use alphalab_runner::{evaluate_predictions, SimMetrics};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn drawdown_stays_within_percent_bounds(
        curve in proptest::collection::vec(1.0..1_000_000.0_f64, 0..200),
    ) {
        let dd = max_drawdown_pct(&curve);
        prop_assert!((0.0..=100.0).contains(&dd), "drawdown {}", dd);
    }

    #[test]
    fn sharpe_is_always_finite(
        curve in proptest::collection::vec(1.0..1_000_000.0_f64, 0..200),
    ) {
        prop_assert!(sharpe_ratio(&curve).is_finite());
    }

    #[test]
    fn ledger_metrics_respect_their_ranges(
        profits in proptest::collection::vec(-10_000.0..10_000.0_f64, 0..100),
    ) {
        let rate = win_rate(&profits);
        prop_assert!((0.0..=1.0).contains(&rate));
        prop_assert!(profit_factor(&profits) >= 0.0);
        prop_assert!(avg_win(&profits) >= 0.0);
        prop_assert!(avg_loss(&profits) <= 0.0);

        let m = SimMetrics::compute(&[10_000.0, 10_500.0], &profits);
        prop_assert_eq!(m.num_wins + m.num_losses, profits.len());
    }

    #[test]
    fn prediction_errors_are_ordered(
        pairs in proptest::collection::vec((-1.0..1.0_f64, -1.0..1.0_f64), 1..100),
    ) {
        let y_true: Vec<f64> = pairs.iter().map(|p| p.0).collect();
        let y_pred: Vec<f64> = pairs.iter().map(|p| p.1).collect();
        let m = evaluate_predictions(&y_true, &y_pred);
        prop_assert!(m.mae >= 0.0);
        // Quadratic mean dominates the arithmetic mean of absolute errors.
        prop_assert!(m.rmse >= m.mae - 1e-12);
        prop_assert!((0.0..=100.0).contains(&m.directional_accuracy));
    }
}
