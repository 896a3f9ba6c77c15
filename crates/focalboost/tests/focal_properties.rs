//! Property-based and parameterised checks of focal loss math.
//!
//! Derivatives are compared against central differences of the closed-form
//! loss across the score range boosting actually produces.

use approx::assert_abs_diff_eq;
use ndarray::Array1;
use proptest::prelude::*;
use rstest::rstest;

use focalboost::numdiff::{central_first, central_second};
use focalboost::{
    Derivatives, FocalLoss, FocalLossParams, ObjectiveFn, ObjectiveFnExt, Parallelism, TargetsView,
    WeightsView, run_with_threads,
};

const TOL: f64 = 1e-4;
const GRAD_STEP: f64 = 1e-5;
const HESS_STEP: f64 = 1e-4;

fn numeric_loss(alpha: f32, gamma: f32) -> FocalLoss {
    let params = FocalLossParams::builder()
        .alpha(alpha)
        .gamma(gamma)
        .derivatives(Derivatives::numeric())
        .build()
        .unwrap();
    FocalLoss::from_params(&params).unwrap()
}

fn arb_label() -> impl Strategy<Value = f64> {
    prop_oneof![Just(0.0), Just(1.0)]
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn loss_is_non_negative(
        x in -50.0f64..50.0,
        t in arb_label(),
        alpha in 0.01f32..0.99,
        gamma in 0.0f32..5.0,
    ) {
        let loss = FocalLoss::new(alpha, gamma).unwrap();
        prop_assert!(loss.loss(x, t) >= 0.0);
    }

    #[test]
    fn analytic_derivatives_match_finite_differences(
        x in -10.0f64..10.0,
        t in arb_label(),
        alpha in 0.01f32..0.99,
        gamma in 0.0f32..5.0,
    ) {
        let loss = FocalLoss::new(alpha, gamma).unwrap();
        let f = |z: f64| loss.loss(z, t);

        let fd_grad = central_first(f, x, GRAD_STEP);
        let fd_hess = central_second(f, x, HESS_STEP);
        prop_assert!((loss.gradient(x, t) - fd_grad).abs() < TOL, "grad {} vs {}", loss.gradient(x, t), fd_grad);
        prop_assert!((loss.hessian(x, t) - fd_hess).abs() < TOL, "hess {} vs {}", loss.hessian(x, t), fd_hess);
    }

    #[test]
    fn numeric_mode_matches_analytic(
        x in -10.0f64..10.0,
        t in arb_label(),
        alpha in 0.01f32..0.99,
        gamma in 0.0f32..5.0,
    ) {
        let analytic = FocalLoss::new(alpha, gamma).unwrap();
        let numeric = numeric_loss(alpha, gamma);

        let (ga, ha) = analytic.grad_hess(x, t);
        let (gn, hn) = numeric.grad_hess(x, t);
        prop_assert!((ga - gn).abs() < TOL);
        prop_assert!((ha - hn).abs() < TOL);
    }

    #[test]
    fn gradient_sign_follows_label(
        x in -10.0f64..10.0,
        alpha in 0.01f32..0.99,
        gamma in 0.0f32..5.0,
    ) {
        let loss = FocalLoss::new(alpha, gamma).unwrap();
        prop_assert!(loss.gradient(x, 1.0) <= 0.0);
        prop_assert!(loss.gradient(x, 0.0) >= 0.0);
    }
}

// =============================================================================
// Parameter Grids
// =============================================================================

#[rstest]
#[case(50.0, 1.0)]
#[case(-50.0, 0.0)]
#[case(50.0, 0.0)]
#[case(-50.0, 1.0)]
#[case(f64::INFINITY, 1.0)]
#[case(f64::NEG_INFINITY, 1.0)]
#[case(f64::INFINITY, 0.0)]
#[case(f64::NEG_INFINITY, 0.0)]
fn extreme_scores_are_finite(#[case] x: f64, #[case] t: f64) {
    for (alpha, gamma) in [(0.25, 2.0), (0.5, 0.0), (0.99, 5.0)] {
        for loss in [FocalLoss::new(alpha, gamma).unwrap(), numeric_loss(alpha, gamma)] {
            let (g, h) = loss.grad_hess(x, t);
            assert!(loss.loss(x, t).is_finite());
            assert!(g.is_finite());
            assert!(h.is_finite());
        }
    }
}

#[rstest]
#[case(0.25, 2.0)]
#[case(0.5, 0.0)]
#[case(0.75, 0.5)]
#[case(0.1, 4.0)]
fn base_score_minimises_mean_loss(#[case] alpha: f32, #[case] gamma: f32) {
    let loss = FocalLoss::new(alpha, gamma).unwrap();
    let labels = Array1::from_iter((0..40).map(|i| (i % 5 == 0) as u8 as f32));
    let targets = TargetsView::new(labels.view());
    let base = loss.compute_base_score(targets, WeightsView::None).unwrap() as f64;

    let mean = |s: f64| labels.iter().map(|&t| loss.loss(s, t as f64)).sum::<f64>() / labels.len() as f64;
    assert!(mean(base) <= mean(base + 0.05) + 1e-9);
    assert!(mean(base) <= mean(base - 0.05) + 1e-9);
}

#[rstest]
#[case(0)]
#[case(1)]
#[case(4)]
fn thread_count_does_not_change_gradients(#[case] n_threads: usize) {
    let preds = Array1::from_iter((0..2_048).map(|i| ((i * 37) % 200) as f32 * 0.1 - 10.0));
    let labels = Array1::from_iter((0..2_048).map(|i| (i % 7 == 0) as u8 as f32));
    let targets = TargetsView::new(labels.view());

    let reference = FocalLoss::default()
        .compute_gradients(preds.view(), targets, WeightsView::None)
        .unwrap();
    let pooled = run_with_threads(n_threads, |parallelism: Parallelism| {
        FocalLoss::default()
            .with_parallelism(parallelism)
            .compute_gradients(preds.view(), targets, WeightsView::None)
            .unwrap()
    });
    assert_eq!(reference, pooled);
}

#[test]
fn half_logistic_at_gamma_zero() {
    let loss = FocalLoss::new(0.5, 0.0).unwrap();
    for x in [-4.0, -1.0, 0.0, 0.5, 3.0] {
        let p = 1.0 / (1.0 + f64::exp(-x));
        assert_abs_diff_eq!(loss.loss(x, 1.0), -0.5 * p.ln(), epsilon = 1e-12);
        assert_abs_diff_eq!(loss.gradient(x, 1.0), 0.5 * (p - 1.0), epsilon = 1e-12);
        assert_abs_diff_eq!(loss.gradient(x, 0.0), 0.5 * p, epsilon = 1e-12);
    }
}
