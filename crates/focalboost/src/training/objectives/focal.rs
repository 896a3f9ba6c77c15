//! Focal loss objective.

use ndarray::{ArrayView1, ArrayViewMut1, Zip};

use super::{ObjectiveFn, PredictionKind, check_buffer, validate_binary_inputs, validate_targets};
use crate::config::{Derivatives, FocalLossParams};
use crate::data::{TargetsView, WeightsView};
use crate::error::{ObjectiveError, ParamValidationError};
use crate::numdiff;
use crate::training::GradsTuple;
use crate::training::metrics::{FocalLossMetric, Metric};
use crate::utils::{Parallelism, sigmoid};

/// Probabilities are clamped into `[PROB_EPS, 1 - PROB_EPS]` before any log.
pub const PROB_EPS: f64 = 1e-9;

const BASE_SCORE_MAX_ITERS: usize = 50;
const BASE_SCORE_TOL: f64 = 1e-7;
const BASE_SCORE_MIN_HESS: f64 = 1e-12;

/// `σ(x)` clamped away from exactly 0 and 1.
#[inline]
fn clamped_sigmoid(x: f64) -> f64 {
    sigmoid(x).clamp(PROB_EPS, 1.0 - PROB_EPS)
}

/// Focal loss for binary classification.
///
/// Expects labels in {0, 1} and raw scores (log-odds). With `p = σ(x)`,
/// `p_t = t·p + (1-t)·(1-p)`:
///
/// - Loss: `-α_t · (1 - p_t)^γ · ln(p_t)`, where `α_t = α·t + (1-α)·(1-t)`
/// - Gradient (t = 1, q = 1 - p): `-α · q^γ · (q - γ·p·ln p)`
/// - Hessian (t = 1): `α · p · q^γ · (q·(1 + 2γ) + γ·ln p·(q - γ·p))`
///
/// The `t = 0` case mirrors `t = 1` at `-x` with weight `1 - α`; the
/// gradient flips sign, the hessian does not.
///
/// The hessian is returned as is and goes negative for confidently wrong
/// samples when `γ > 0`. Floor it at step time with
/// [`GradsTuple::newton_step`].
///
/// With `γ = 0, α = 0.5` the gradient is exactly half that of
/// [`super::LogisticLoss`]. The hessian is half until the logistic hessian
/// hits its `1e-6` floor (`|x| ≳ 13.8` or zero-weight rows).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FocalLoss {
    alpha: f64,
    gamma: f64,
    derivatives: Derivatives,
    parallelism: Parallelism,
}

impl Default for FocalLoss {
    fn default() -> Self {
        let params = FocalLossParams::default();
        Self {
            alpha: params.alpha as f64,
            gamma: params.gamma as f64,
            derivatives: params.derivatives,
            parallelism: Parallelism::Sequential,
        }
    }
}

impl FocalLoss {
    /// Focal loss with analytic derivatives.
    pub fn new(alpha: f32, gamma: f32) -> Result<Self, ParamValidationError> {
        Self::from_params(&FocalLossParams {
            alpha,
            gamma,
            derivatives: Derivatives::Analytic,
        })
    }

    /// Focal loss from validated parameters.
    pub fn from_params(params: &FocalLossParams) -> Result<Self, ParamValidationError> {
        params.validate()?;
        Ok(Self {
            alpha: params.alpha as f64,
            gamma: params.gamma as f64,
            derivatives: params.derivatives,
            parallelism: Parallelism::Sequential,
        })
    }

    /// Set how the per-row pass is executed.
    pub fn with_parallelism(mut self, parallelism: Parallelism) -> Self {
        self.parallelism = parallelism;
        self
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    pub fn derivatives(&self) -> Derivatives {
        self.derivatives
    }

    pub fn parallelism(&self) -> Parallelism {
        self.parallelism
    }

    /// The parameters this loss was built from.
    pub fn params(&self) -> FocalLossParams {
        FocalLossParams {
            alpha: self.alpha as f32,
            gamma: self.gamma as f32,
            derivatives: self.derivatives,
        }
    }

    /// Per-sample loss for score `x` and label `t ∈ {0, 1}`.
    #[inline]
    pub fn loss(&self, x: f64, t: f64) -> f64 {
        // 1 - p is taken as σ(-x) to avoid cancellation for large x.
        let p = clamped_sigmoid(x);
        let one_minus_p = clamped_sigmoid(-x);

        let p_t = t * p + (1.0 - t) * one_minus_p;
        let modulating_factor = (1.0 - p_t).powf(self.gamma);
        let class_weight = self.alpha * t + (1.0 - self.alpha) * (1.0 - t);
        let cross_entropy = t * p.ln() + (1.0 - t) * one_minus_p.ln();

        -class_weight * modulating_factor * cross_entropy
    }

    /// Per-sample gradient ∂L/∂x.
    #[inline]
    pub fn gradient(&self, x: f64, t: f64) -> f64 {
        self.grad_hess(x, t).0
    }

    /// Per-sample hessian ∂²L/∂x².
    #[inline]
    pub fn hessian(&self, x: f64, t: f64) -> f64 {
        self.grad_hess(x, t).1
    }

    /// Per-sample `(gradient, hessian)` in the configured derivative mode.
    #[inline]
    pub fn grad_hess(&self, x: f64, t: f64) -> (f64, f64) {
        match self.derivatives {
            Derivatives::Analytic => self.analytic_grad_hess(x, t),
            Derivatives::Numeric { step } => {
                let f = |z: f64| self.loss(z, t);
                (
                    numdiff::central_first(f, x, step),
                    numdiff::central_second(f, x, step),
                )
            }
        }
    }

    #[inline]
    fn analytic_grad_hess(&self, x: f64, t: f64) -> (f64, f64) {
        // Express both labels through the t = 1 formula on p_t.
        let (p_t, q_t, weight, sign) = if t > 0.5 {
            (clamped_sigmoid(x), clamped_sigmoid(-x), self.alpha, 1.0)
        } else {
            (clamped_sigmoid(-x), clamped_sigmoid(x), 1.0 - self.alpha, -1.0)
        };
        let gamma = self.gamma;
        let ln_p = p_t.ln();
        let q_gamma = q_t.powf(gamma);

        let grad = -weight * q_gamma * (q_t - gamma * p_t * ln_p);
        let hess = weight
            * p_t
            * q_gamma
            * (q_t * (1.0 + 2.0 * gamma) + gamma * ln_p * (q_t - gamma * p_t));

        (sign * grad, hess)
    }

    /// Weighted mean loss over a validated batch. Returns 0.0 for zero total weight.
    pub(crate) fn mean_loss(
        &self,
        predictions: ArrayView1<'_, f32>,
        targets: TargetsView<'_>,
        weights: WeightsView<'_>,
    ) -> f64 {
        let n_rows = predictions.len();
        let (sum_loss, sum_w) = predictions
            .iter()
            .zip(targets.view().iter())
            .zip(weights.iter(n_rows))
            .fold((0.0f64, 0.0f64), |(sl, sw), ((&x, &t), w)| {
                let w = w as f64;
                (sl + w * self.loss(x as f64, t as f64), sw + w)
            });

        if sum_w > 0.0 { sum_loss / sum_w } else { 0.0 }
    }
}

impl ObjectiveFn for FocalLoss {
    fn compute_gradients_into(
        &self,
        predictions: ArrayView1<'_, f32>,
        targets: TargetsView<'_>,
        weights: WeightsView<'_>,
        grad_hess: ArrayViewMut1<'_, GradsTuple>,
    ) -> Result<(), ObjectiveError> {
        validate_binary_inputs(predictions, targets, weights)?;
        check_buffer(predictions.len(), grad_hess.len())?;

        if tracing::enabled!(tracing::Level::DEBUG) {
            let saturated = predictions
                .iter()
                .filter(|&&x| {
                    let p = sigmoid(x as f64);
                    !(PROB_EPS..=1.0 - PROB_EPS).contains(&p)
                })
                .count();
            if saturated > 0 {
                tracing::debug!(
                    saturated,
                    n_rows = predictions.len(),
                    "focal loss: clamped probabilities for saturated scores"
                );
            }
        }

        let kernel = |i: usize, gh: &mut GradsTuple, &x: &f32, &t: &f32| {
            let w = weights.get(i) as f64;
            let (grad, hess) = self.grad_hess(x as f64, t as f64);
            gh.grad = (w * grad) as f32;
            gh.hess = (w * hess) as f32;
        };

        let zip = Zip::indexed(grad_hess).and(predictions).and(targets.view());
        match self.parallelism {
            Parallelism::Sequential => zip.for_each(kernel),
            Parallelism::Parallel => zip.par_for_each(kernel),
        }
        Ok(())
    }

    /// Damped Newton iteration from the weighted log-odds prior.
    fn compute_base_score(
        &self,
        targets: TargetsView<'_>,
        weights: WeightsView<'_>,
    ) -> Result<f32, ObjectiveError> {
        validate_targets(targets, weights)?;
        let n_rows = targets.n_samples();

        let (pos_weight, total_weight) = targets
            .view()
            .iter()
            .zip(weights.iter(n_rows))
            .fold((0.0f64, 0.0f64), |(pos, total), (&t, w)| {
                (pos + t as f64 * w as f64, total + w as f64)
            });
        if total_weight <= 0.0 {
            return Ok(0.0);
        }

        let prior = (pos_weight / total_weight).clamp(1e-7, 1.0 - 1e-7);
        let mut score = (prior / (1.0 - prior)).ln();

        for _ in 0..BASE_SCORE_MAX_ITERS {
            let (grad, hess) = targets
                .view()
                .iter()
                .zip(weights.iter(n_rows))
                .fold((0.0f64, 0.0f64), |(g, h), (&t, w)| {
                    let (gi, hi) = self.grad_hess(score, t as f64);
                    (g + w as f64 * gi, h + w as f64 * hi)
                });
            if hess <= BASE_SCORE_MIN_HESS {
                break;
            }
            let step = (grad / hess).clamp(-1.0, 1.0);
            score -= step;
            if step.abs() < BASE_SCORE_TOL {
                break;
            }
        }

        Ok(score as f32)
    }

    fn transform_predictions_inplace(&self, mut predictions: ArrayViewMut1<'_, f32>) -> PredictionKind {
        predictions.mapv_inplace(|x| sigmoid(x as f64) as f32);
        PredictionKind::Probability
    }

    fn default_metric(&self) -> Metric {
        Metric::FocalLoss(FocalLossMetric::new(*self))
    }

    fn name(&self) -> &'static str {
        "focal"
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::training::ObjectiveFnExt;
    use crate::training::objectives::LogisticLoss;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    fn focal(alpha: f32, gamma: f32) -> FocalLoss {
        FocalLoss::new(alpha, gamma).unwrap()
    }

    #[test]
    fn loss_at_zero_score() {
        let obj = focal(0.25, 2.0);
        let ln2 = std::f64::consts::LN_2;

        // p = 0.5: (1 - p_t)^2 = 0.25
        assert_abs_diff_eq!(obj.loss(0.0, 1.0), 0.25 * 0.25 * ln2, epsilon = 1e-12);
        assert_abs_diff_eq!(obj.loss(0.0, 0.0), 0.75 * 0.25 * ln2, epsilon = 1e-12);
    }

    #[test]
    fn gradient_and_hessian_at_zero_score() {
        let obj = focal(0.25, 2.0);
        let ln2 = std::f64::consts::LN_2;

        // t = 1: -α · 0.25 · (0.5 + ln 2)
        assert_abs_diff_eq!(obj.gradient(0.0, 1.0), -0.0625 * (0.5 + ln2), epsilon = 1e-12);
        // t = 1: α · 0.5 · 0.25 · (2.5 + ln 2)
        assert_abs_diff_eq!(obj.hessian(0.0, 1.0), 0.03125 * (2.5 + ln2), epsilon = 1e-12);
        // t = 0 mirrors with weight 0.75
        assert_abs_diff_eq!(obj.gradient(0.0, 0.0), 0.1875 * (0.5 + ln2), epsilon = 1e-12);
        assert_abs_diff_eq!(obj.hessian(0.0, 0.0), 0.09375 * (2.5 + ln2), epsilon = 1e-12);
    }

    #[test]
    fn loss_is_non_negative() {
        let obj = focal(0.3, 1.5);
        for i in -200..=200 {
            let x = i as f64 * 0.25;
            assert!(obj.loss(x, 1.0) >= 0.0);
            assert!(obj.loss(x, 0.0) >= 0.0);
        }
    }

    #[test]
    fn analytic_matches_finite_differences() {
        let obj = focal(0.25, 2.0);
        for t in [0.0, 1.0] {
            for i in -40..=40 {
                let x = i as f64 * 0.25;
                let f = |z: f64| obj.loss(z, t);
                assert_abs_diff_eq!(obj.gradient(x, t), numdiff::central_first(f, x, 1e-5), epsilon = 1e-4);
                assert_abs_diff_eq!(obj.hessian(x, t), numdiff::central_second(f, x, 1e-4), epsilon = 1e-4);
            }
        }
    }

    #[test]
    fn numeric_mode_matches_analytic() {
        let analytic = focal(0.4, 3.0);
        let numeric = FocalLoss::from_params(&FocalLossParams {
            alpha: 0.4,
            gamma: 3.0,
            derivatives: Derivatives::numeric(),
        })
        .unwrap();

        for t in [0.0, 1.0] {
            for i in -20..=20 {
                let x = i as f64 * 0.5;
                let (ga, ha) = analytic.grad_hess(x, t);
                let (gn, hn) = numeric.grad_hess(x, t);
                assert_abs_diff_eq!(ga, gn, epsilon = 1e-4);
                assert_abs_diff_eq!(ha, hn, epsilon = 1e-4);
            }
        }
    }

    #[test]
    fn extreme_scores_stay_finite() {
        for obj in [focal(0.25, 2.0), focal(0.25, 0.0), focal(0.9, 0.5)] {
            for x in [50.0, -50.0, 1e4, -1e4, f64::INFINITY, f64::NEG_INFINITY] {
                for t in [0.0, 1.0] {
                    let (g, h) = obj.grad_hess(x, t);
                    assert!(obj.loss(x, t).is_finite(), "loss({x}, {t})");
                    assert!(g.is_finite(), "grad({x}, {t})");
                    assert!(h.is_finite(), "hess({x}, {t})");
                }
            }
        }
    }

    #[test]
    fn gamma_zero_half_alpha_is_half_logistic() {
        let obj = focal(0.5, 0.0);
        let preds = array![-3.0f32, -0.5, 0.0, 0.7, 2.5];
        let labels = array![0.0f32, 1.0, 1.0, 0.0, 1.0];
        let targets = TargetsView::new(labels.view());

        let focal_grads = obj.compute_gradients(preds.view(), targets, WeightsView::None).unwrap();
        let logistic_grads = LogisticLoss
            .compute_gradients(preds.view(), targets, WeightsView::None)
            .unwrap();

        for i in 0..preds.len() {
            assert_abs_diff_eq!(focal_grads.get(i).grad * 2.0, logistic_grads.get(i).grad, epsilon = 1e-6);
            assert_abs_diff_eq!(focal_grads.get(i).hess * 2.0, logistic_grads.get(i).hess, epsilon = 1e-6);
        }
    }

    #[test]
    fn gamma_zero_hessian_diverges_at_logistic_floor() {
        let obj = focal(0.5, 0.0);
        let preds = array![20.0f32, -20.0];
        let labels = array![1.0f32, 0.0];
        let targets = TargetsView::new(labels.view());

        let focal_grads = obj.compute_gradients(preds.view(), targets, WeightsView::None).unwrap();
        let logistic_grads = LogisticLoss
            .compute_gradients(preds.view(), targets, WeightsView::None)
            .unwrap();

        for i in 0..preds.len() {
            // Gradients stay exactly half, far below the floor.
            assert_abs_diff_eq!(focal_grads.get(i).grad * 2.0, logistic_grads.get(i).grad, epsilon = 1e-12);
            // σ(20)·σ(-20) ≈ 2e-9: focal keeps it, logistic floors at 1e-6.
            assert_eq!(logistic_grads.get(i).hess, 1e-6);
            assert!(focal_grads.get(i).hess * 2.0 < 1e-8);
        }
    }

    #[test]
    fn debug_subscriber_does_not_change_saturated_gradients() {
        let obj = focal(0.25, 2.0);
        let preds = array![40.0f32, -40.0, 0.3, 25.0];
        let labels = array![1.0f32, 1.0, 0.0, 0.0];
        let targets = TargetsView::new(labels.view());

        let quiet = obj.compute_gradients(preds.view(), targets, WeightsView::None).unwrap();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .finish();
        let traced = tracing::subscriber::with_default(subscriber, || {
            assert!(tracing::enabled!(tracing::Level::DEBUG));
            obj.compute_gradients(preds.view(), targets, WeightsView::None).unwrap()
        });

        for i in 0..preds.len() {
            assert_eq!(quiet.get(i), traced.get(i));
        }
    }

    #[test]
    fn weighted_gradients_scale() {
        let obj = focal(0.25, 2.0);
        let preds = array![1.0f32, -2.0, 0.5];
        let labels = array![1.0f32, 1.0, 0.0];
        let weights = array![2.0f32, 0.5, 0.0];
        let targets = TargetsView::new(labels.view());

        let plain = obj.compute_gradients(preds.view(), targets, WeightsView::None).unwrap();
        let weighted = obj
            .compute_gradients(preds.view(), targets, WeightsView::from_array(weights.view()))
            .unwrap();

        for i in 0..3 {
            assert_abs_diff_eq!(weighted.get(i).grad, weights[i] * plain.get(i).grad, epsilon = 1e-6);
            assert_abs_diff_eq!(weighted.get(i).hess, weights[i] * plain.get(i).hess, epsilon = 1e-6);
        }
    }

    #[test]
    fn parallel_matches_sequential() {
        let n = 1_000;
        let preds = ndarray::Array1::from_iter((0..n).map(|i| (i as f32 - 500.0) * 0.03));
        let labels = ndarray::Array1::from_iter((0..n).map(|i| (i % 3 == 0) as u8 as f32));
        let targets = TargetsView::new(labels.view());

        let sequential = focal(0.25, 2.0)
            .compute_gradients(preds.view(), targets, WeightsView::None)
            .unwrap();
        let parallel = focal(0.25, 2.0)
            .with_parallelism(Parallelism::Parallel)
            .compute_gradients(preds.view(), targets, WeightsView::None)
            .unwrap();
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn base_score_gamma_zero_is_weighted_logodds() {
        let obj = focal(0.25, 0.0);
        let labels = array![1.0f32, 1.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0];
        let base = obj
            .compute_base_score(TargetsView::new(labels.view()), WeightsView::None)
            .unwrap();

        // Optimum of α-weighted cross-entropy: p = α·n1 / (α·n1 + (1-α)·n0)
        let p: f64 = 0.25 * 3.0 / (0.25 * 3.0 + 0.75 * 7.0);
        let expected = (p / (1.0 - p)).ln();
        assert_abs_diff_eq!(base as f64, expected, epsilon = 1e-4);
    }

    #[test]
    fn base_score_is_stationary() {
        let obj = focal(0.25, 2.0);
        let labels = array![1.0f32, 0.0, 0.0, 0.0, 1.0, 0.0];
        let targets = TargetsView::new(labels.view());
        let base = obj.compute_base_score(targets, WeightsView::None).unwrap();

        let preds = ndarray::Array1::from_elem(labels.len(), base);
        let (grad_sum, hess_sum) = obj
            .compute_gradients(preds.view(), targets, WeightsView::None)
            .unwrap()
            .sum();
        assert!(hess_sum > 0.0);
        assert_abs_diff_eq!(grad_sum, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn transform_applies_sigmoid() {
        let mut preds = array![0.0f32, 100.0, -100.0];
        let kind = focal(0.25, 2.0).transform_predictions_inplace(preds.view_mut());
        assert_eq!(kind, PredictionKind::Probability);
        assert_abs_diff_eq!(preds[0], 0.5, epsilon = 1e-7);
        assert_abs_diff_eq!(preds[1], 1.0, epsilon = 1e-7);
        assert_abs_diff_eq!(preds[2], 0.0, epsilon = 1e-7);
    }

    #[test]
    fn params_roundtrip() {
        let obj = focal(0.4, 1.5);
        assert_eq!(obj.params().alpha, 0.4);
        assert_eq!(obj.params().gamma, 1.5);
        assert_eq!(obj.name(), "focal");
        assert!(matches!(obj.default_metric(), Metric::FocalLoss(_)));
    }

    #[test]
    fn invalid_params_rejected() {
        assert_eq!(FocalLoss::new(-0.1, 2.0), Err(ParamValidationError::InvalidAlpha(-0.1)));
        assert_eq!(FocalLoss::new(0.5, -1.0), Err(ParamValidationError::InvalidGamma(-1.0)));
    }
}
