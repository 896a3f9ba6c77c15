//! Classification metrics.

use ndarray::ArrayView1;

use super::{MetricFn, check_lengths};
use crate::data::{TargetsView, WeightsView};
use crate::error::ObjectiveError;
use crate::training::{FocalLoss, PredictionKind};

// =============================================================================
// Focal Loss Metric
// =============================================================================

/// Mean focal loss: `sum(w * loss(x, t)) / sum(w)`.
///
/// Lower is better. Evaluated on raw scores with the same `alpha` / `gamma`
/// as the objective it monitors.
#[derive(Debug, Clone, Copy, Default)]
pub struct FocalLossMetric {
    loss: FocalLoss,
}

impl FocalLossMetric {
    pub fn new(loss: FocalLoss) -> Self {
        Self { loss }
    }
}

impl MetricFn for FocalLossMetric {
    fn compute(
        &self,
        predictions: ArrayView1<'_, f32>,
        targets: TargetsView<'_>,
        weights: WeightsView<'_>,
    ) -> Result<f64, ObjectiveError> {
        check_lengths(predictions, targets, weights)?;
        Ok(self.loss.mean_loss(predictions, targets, weights))
    }

    fn higher_is_better(&self) -> bool {
        false
    }

    fn expected_prediction_kind(&self) -> PredictionKind {
        PredictionKind::Margin
    }

    fn name(&self) -> &'static str {
        "focal_loss"
    }
}

// =============================================================================
// LogLoss (Binary Cross-Entropy)
// =============================================================================

/// Binary cross-entropy: -mean(y*log(p) + (1-y)*log(1-p))
///
/// Lower is better. Expects predictions to be probabilities in (0, 1).
#[derive(Debug, Clone, Copy, Default)]
pub struct LogLoss;

impl MetricFn for LogLoss {
    fn compute(
        &self,
        predictions: ArrayView1<'_, f32>,
        targets: TargetsView<'_>,
        weights: WeightsView<'_>,
    ) -> Result<f64, ObjectiveError> {
        check_lengths(predictions, targets, weights)?;
        let n_rows = predictions.len();

        const EPS: f64 = 1e-15;

        let (sum_loss, sum_w) = predictions
            .iter()
            .zip(targets.view().iter())
            .zip(weights.iter(n_rows))
            .fold((0.0f64, 0.0f64), |(sl, sw), ((&p, &l), w)| {
                let p = (p as f64).clamp(EPS, 1.0 - EPS);
                let l = l as f64;
                let loss = -(l * p.ln() + (1.0 - l) * (1.0 - p).ln());
                (sl + (w as f64) * loss, sw + w as f64)
            });

        Ok(if sum_w > 0.0 { sum_loss / sum_w } else { 0.0 })
    }

    fn higher_is_better(&self) -> bool {
        false
    }

    fn expected_prediction_kind(&self) -> PredictionKind {
        PredictionKind::Probability
    }

    fn name(&self) -> &'static str {
        "logloss"
    }
}
