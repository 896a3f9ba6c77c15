//! Evaluation metrics for model quality.
//!
//! Metrics are separate from loss functions: a model might be trained with
//! one loss but evaluated with different metrics. They never affect
//! optimization; a training loop only tracks and logs them.
//!
//! # Weighted Evaluation
//!
//! All metrics support optional sample weights via the `weights` parameter.
//! Weighted formulas are `sum(w * value) / sum(w)`.
//!
//! # Available Metrics
//!
//! - [`FocalLossMetric`]: Mean focal loss on raw scores
//! - [`LogLoss`]: Binary cross-entropy on probabilities

mod classification;

pub use classification::{FocalLossMetric, LogLoss};

use ndarray::ArrayView1;

use crate::data::{TargetsView, WeightsView, check_weights};
use crate::error::ObjectiveError;
use crate::training::PredictionKind;

/// Reject batches whose predictions, labels and weights disagree in length.
///
/// Empty batches pass; metrics report `0.0` for them.
pub(crate) fn check_lengths(
    predictions: ArrayView1<'_, f32>,
    targets: TargetsView<'_>,
    weights: WeightsView<'_>,
) -> Result<(), ObjectiveError> {
    if predictions.len() != targets.n_samples() {
        return Err(ObjectiveError::LengthMismatch {
            predictions: predictions.len(),
            labels: targets.n_samples(),
        });
    }
    if let Some(w) = weights.as_array() {
        check_weights(w, targets.n_samples())?;
    }
    Ok(())
}

// =============================================================================
// MetricFn Trait
// =============================================================================

/// A metric for evaluating model quality.
///
/// `compute` rejects mismatched lengths and bad weights; label and score
/// checks are left to [`crate::training::Evaluator`]. Empty input or zero
/// total weight yields `0.0`.
pub trait MetricFn: Send + Sync {
    /// Compute the metric value.
    fn compute(
        &self,
        predictions: ArrayView1<'_, f32>,
        targets: TargetsView<'_>,
        weights: WeightsView<'_>,
    ) -> Result<f64, ObjectiveError>;

    /// Whether higher values indicate better performance.
    fn higher_is_better(&self) -> bool;

    /// What prediction space this metric expects.
    fn expected_prediction_kind(&self) -> PredictionKind;

    /// Name of the metric (for logging).
    fn name(&self) -> &'static str;

    /// Whether this metric is enabled. Disabled metrics skip evaluation.
    fn is_enabled(&self) -> bool {
        true
    }
}

// =============================================================================
// Metric Enum (Convenience wrapper)
// =============================================================================

/// A dynamically-dispatched metric function.
///
/// # Example
///
/// ```
/// use focalboost::{FocalLoss, Metric, MetricFn};
///
/// let focal = Metric::focal(FocalLoss::default());
/// assert_eq!(focal.name(), "focal_loss");
/// assert!(!focal.higher_is_better());
///
/// // No metric (skips evaluation)
/// assert!(!Metric::none().is_enabled());
/// ```
#[derive(Debug, Clone, Default)]
pub enum Metric {
    /// No metric - skips evaluation entirely.
    #[default]
    None,
    /// Mean focal loss.
    FocalLoss(FocalLossMetric),
    /// Log Loss / Binary Cross-Entropy.
    LogLoss(LogLoss),
}

impl Metric {
    /// No metric - skips evaluation entirely.
    pub fn none() -> Self {
        Self::None
    }

    /// Mean focal loss for the given objective's parameters.
    pub fn focal(loss: crate::FocalLoss) -> Self {
        Self::FocalLoss(FocalLossMetric::new(loss))
    }

    /// Log Loss for binary classification.
    pub fn logloss() -> Self {
        Self::LogLoss(LogLoss)
    }
}

impl MetricFn for Metric {
    fn compute(
        &self,
        predictions: ArrayView1<'_, f32>,
        targets: TargetsView<'_>,
        weights: WeightsView<'_>,
    ) -> Result<f64, ObjectiveError> {
        match self {
            Self::None => Ok(0.0),
            Self::FocalLoss(inner) => inner.compute(predictions, targets, weights),
            Self::LogLoss(inner) => inner.compute(predictions, targets, weights),
        }
    }

    fn higher_is_better(&self) -> bool {
        match self {
            Self::None => false,
            Self::FocalLoss(inner) => inner.higher_is_better(),
            Self::LogLoss(inner) => inner.higher_is_better(),
        }
    }

    fn expected_prediction_kind(&self) -> PredictionKind {
        match self {
            Self::None => PredictionKind::Margin,
            Self::FocalLoss(inner) => inner.expected_prediction_kind(),
            Self::LogLoss(inner) => inner.expected_prediction_kind(),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::None => "<none>",
            Self::FocalLoss(inner) => inner.name(),
            Self::LogLoss(inner) => inner.name(),
        }
    }

    fn is_enabled(&self) -> bool {
        !matches!(self, Self::None)
    }
}
