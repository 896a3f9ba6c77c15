//! Classification objective functions.

use ndarray::{ArrayView1, ArrayViewMut1, Zip};

use super::{ObjectiveFn, PredictionKind, check_buffer, validate_binary_inputs, validate_targets};
use crate::data::{TargetsView, WeightsView};
use crate::error::ObjectiveError;
use crate::training::GradsTuple;
use crate::training::metrics::{LogLoss, Metric};
use crate::utils::sigmoid;

// =============================================================================
// Logistic Loss
// =============================================================================

/// Logistic loss (log loss / binary cross-entropy) for binary classification.
///
/// Expects labels in {0, 1} and outputs log-odds.
/// - Loss: `-y*log(σ(pred)) - (1-y)*log(1-σ(pred))` where σ is sigmoid
/// - Gradient: `σ(pred) - y`
/// - Hessian: `σ(pred) * (1 - σ(pred))`
#[derive(Debug, Clone, Copy, Default)]
pub struct LogisticLoss;

impl ObjectiveFn for LogisticLoss {
    fn compute_gradients_into(
        &self,
        predictions: ArrayView1<'_, f32>,
        targets: TargetsView<'_>,
        weights: WeightsView<'_>,
        grad_hess: ArrayViewMut1<'_, GradsTuple>,
    ) -> Result<(), ObjectiveError> {
        validate_binary_inputs(predictions, targets, weights)?;
        check_buffer(predictions.len(), grad_hess.len())?;

        const HESS_MIN: f64 = 1e-6;

        Zip::indexed(grad_hess)
            .and(predictions)
            .and(targets.view())
            .for_each(|i, gh, &x, &t| {
                let w = weights.get(i) as f64;
                let p = sigmoid(x as f64);
                gh.grad = (w * (p - t as f64)) as f32;
                gh.hess = (w * p * (1.0 - p)).max(HESS_MIN) as f32;
            });
        Ok(())
    }

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

        // Convert to log-odds
        let p = (pos_weight / total_weight).clamp(1e-7, 1.0 - 1e-7);
        Ok((p / (1.0 - p)).ln() as f32)
    }

    fn transform_predictions_inplace(&self, mut predictions: ArrayViewMut1<'_, f32>) -> PredictionKind {
        predictions.mapv_inplace(|x| sigmoid(x as f64) as f32);
        PredictionKind::Probability
    }

    fn default_metric(&self) -> Metric {
        Metric::LogLoss(LogLoss)
    }

    fn name(&self) -> &'static str {
        "logistic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::training::ObjectiveFnExt;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn logistic_loss_gradient() {
        let preds = array![0.0f32, 0.0];
        let labels = array![0.0f32, 1.0];
        let grads = LogisticLoss
            .compute_gradients(preds.view(), TargetsView::new(labels.view()), WeightsView::None)
            .unwrap();

        // pred = 0 → p = 0.5
        assert_abs_diff_eq!(grads.get(0).grad, 0.5, epsilon = 1e-6);
        assert_abs_diff_eq!(grads.get(1).grad, -0.5, epsilon = 1e-6);
        assert_abs_diff_eq!(grads.get(0).hess, 0.25, epsilon = 1e-6);
    }

    #[test]
    fn logistic_loss_extreme_values() {
        let preds = array![100.0f32, -100.0];
        let labels = array![1.0f32, 0.0];
        let grads = LogisticLoss
            .compute_gradients(preds.view(), TargetsView::new(labels.view()), WeightsView::None)
            .unwrap();

        for i in 0..2 {
            assert!(grads.get(i).grad.abs() < 0.01);
            assert!(grads.get(i).hess > 0.0);
        }
    }

    #[test]
    fn logistic_base_score() {
        let labels = array![1.0f32, 0.0, 0.0, 0.0];
        let base = LogisticLoss
            .compute_base_score(TargetsView::new(labels.view()), WeightsView::None)
            .unwrap();
        assert_abs_diff_eq!(base, (1.0f32 / 3.0).ln(), epsilon = 1e-6);
    }
}
