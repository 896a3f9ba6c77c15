//! Objective (loss) functions for gradient boosting.
//!
//! Objectives compute per-sample gradients and hessians of a loss with
//! respect to raw scores (margins), which a boosting library fits the next
//! weak learner to.
//!
//! # Weighted Training
//!
//! All objectives support sample weights via [`WeightsView`]. Pass
//! `WeightsView::None` for unweighted computation.
//!
//! # Validation
//!
//! Inputs are validated before any math runs: equal positive lengths, labels
//! exactly 0 or 1, no NaN scores, finite non-negative weights. Infinite
//! scores are allowed and saturate.
//!
//! # Available Objectives
//!
//! - [`FocalLoss`]: Focal loss (class-balanced, focusing on hard samples)
//! - [`LogisticLoss`]: Binary cross-entropy

mod classification;
mod focal;

pub use classification::LogisticLoss;
pub use focal::{FocalLoss, PROB_EPS};

use std::sync::Arc;

use ndarray::{ArrayView1, ArrayViewMut1};

use crate::data::{TargetsView, WeightsView, check_weights};
use crate::error::ObjectiveError;
use crate::training::metrics::Metric;
use crate::training::{GradsTuple, Gradients};

// =============================================================================
// Prediction Kind
// =============================================================================

/// What space a vector of predictions lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredictionKind {
    /// Raw scores (log-odds) as produced by the booster.
    Margin,
    /// Probabilities in [0, 1].
    Probability,
}

// =============================================================================
// Input Validation
// =============================================================================

/// Validate labels and weights for a binary objective.
pub(crate) fn validate_targets(
    targets: TargetsView<'_>,
    weights: WeightsView<'_>,
) -> Result<(), ObjectiveError> {
    let n_rows = targets.n_samples();
    if n_rows == 0 {
        return Err(ObjectiveError::EmptyInput);
    }
    if let Some(index) = targets.view().iter().position(|&t| t != 0.0 && t != 1.0) {
        return Err(ObjectiveError::InvalidLabel {
            index,
            value: targets.get(index),
        });
    }
    if let Some(w) = weights.as_array() {
        check_weights(w, n_rows)?;
    }
    Ok(())
}

/// Validate a full `(predictions, labels, weights)` batch.
pub(crate) fn validate_binary_inputs(
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
    validate_targets(targets, weights)?;
    if let Some(index) = predictions.iter().position(|x| x.is_nan()) {
        return Err(ObjectiveError::NanPrediction { index });
    }
    Ok(())
}

fn check_buffer(expected: usize, got: usize) -> Result<(), ObjectiveError> {
    if expected == got {
        Ok(())
    } else {
        Err(ObjectiveError::BufferLengthMismatch { expected, got })
    }
}

// =============================================================================
// Objective Trait
// =============================================================================

/// An objective (loss) function for training gradient boosted models.
///
/// Implementations are pure: every call is a function of its inputs only.
pub trait ObjectiveFn: Send + Sync {
    /// Compute gradients and hessians for the given predictions.
    ///
    /// # Arguments
    ///
    /// * `predictions` - Raw model scores `[n_rows]`
    /// * `targets` - Ground truth labels `[n_rows]`
    /// * `weights` - Sample weights (`WeightsView::None` for unweighted)
    /// * `grad_hess` - Output buffer `[n_rows]`
    fn compute_gradients_into(
        &self,
        predictions: ArrayView1<'_, f32>,
        targets: TargetsView<'_>,
        weights: WeightsView<'_>,
        grad_hess: ArrayViewMut1<'_, GradsTuple>,
    ) -> Result<(), ObjectiveError>;

    /// Compute the initial base score (bias) from targets.
    ///
    /// This is the optimal constant raw score before any trees are added.
    fn compute_base_score(
        &self,
        targets: TargetsView<'_>,
        weights: WeightsView<'_>,
    ) -> Result<f32, ObjectiveError>;

    /// Transform raw predictions in-place into the objective's output space.
    fn transform_predictions_inplace(&self, predictions: ArrayViewMut1<'_, f32>) -> PredictionKind;

    /// Metric used when none is configured.
    fn default_metric(&self) -> Metric;

    /// Name of the objective (for logging).
    fn name(&self) -> &'static str;
}

/// Allocating convenience methods for any [`ObjectiveFn`].
pub trait ObjectiveFnExt: ObjectiveFn {
    /// Compute gradients into a freshly allocated buffer.
    fn compute_gradients(
        &self,
        predictions: ArrayView1<'_, f32>,
        targets: TargetsView<'_>,
        weights: WeightsView<'_>,
    ) -> Result<Gradients, ObjectiveError> {
        let mut gradients = Gradients::new(predictions.len());
        self.compute_gradients_into(predictions, targets, weights, gradients.view_mut())?;
        Ok(gradients)
    }
}

impl<T: ObjectiveFn + ?Sized> ObjectiveFnExt for T {}

// =============================================================================
// Objective Enum (Convenience wrapper)
// =============================================================================

/// Objective function enum for easy configuration.
///
/// Wraps the available objective types and implements [`ObjectiveFn`] by
/// delegating to the underlying concrete type.
///
/// # Example
///
/// ```
/// use focalboost::{FocalLossParams, Objective, ObjectiveFn};
///
/// let objective = Objective::focal(FocalLossParams::default()).unwrap();
/// assert_eq!(objective.name(), "focal");
/// ```
#[derive(Clone)]
pub enum Objective {
    /// Focal loss for imbalanced binary classification.
    Focal(FocalLoss),
    /// Logistic loss for binary classification.
    Logistic(LogisticLoss),
    /// Custom objective (user-provided implementation).
    Custom(Arc<dyn ObjectiveFn>),
}

impl std::fmt::Debug for Objective {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Focal(inner) => f.debug_tuple("Focal").field(inner).finish(),
            Self::Logistic(inner) => f.debug_tuple("Logistic").field(inner).finish(),
            Self::Custom(_) => f.debug_tuple("Custom").field(&"<dyn ObjectiveFn>").finish(),
        }
    }
}

/// Convenience constructors.
impl Objective {
    /// Focal loss with the given parameters.
    pub fn focal(params: crate::FocalLossParams) -> Result<Self, ObjectiveError> {
        Ok(Self::Focal(FocalLoss::from_params(&params)?))
    }

    /// Binary logistic loss.
    pub fn logistic() -> Self {
        Self::Logistic(LogisticLoss)
    }

    /// Custom objective with user-provided implementation.
    pub fn custom<O: ObjectiveFn + 'static>(objective: O) -> Self {
        Self::Custom(Arc::new(objective))
    }
}

impl Default for Objective {
    fn default() -> Self {
        Self::Focal(FocalLoss::default())
    }
}

impl ObjectiveFn for Objective {
    fn compute_gradients_into(
        &self,
        predictions: ArrayView1<'_, f32>,
        targets: TargetsView<'_>,
        weights: WeightsView<'_>,
        grad_hess: ArrayViewMut1<'_, GradsTuple>,
    ) -> Result<(), ObjectiveError> {
        match self {
            Self::Focal(inner) => inner.compute_gradients_into(predictions, targets, weights, grad_hess),
            Self::Logistic(inner) => inner.compute_gradients_into(predictions, targets, weights, grad_hess),
            Self::Custom(inner) => inner.compute_gradients_into(predictions, targets, weights, grad_hess),
        }
    }

    fn compute_base_score(
        &self,
        targets: TargetsView<'_>,
        weights: WeightsView<'_>,
    ) -> Result<f32, ObjectiveError> {
        match self {
            Self::Focal(inner) => inner.compute_base_score(targets, weights),
            Self::Logistic(inner) => inner.compute_base_score(targets, weights),
            Self::Custom(inner) => inner.compute_base_score(targets, weights),
        }
    }

    fn transform_predictions_inplace(&self, predictions: ArrayViewMut1<'_, f32>) -> PredictionKind {
        match self {
            Self::Focal(inner) => inner.transform_predictions_inplace(predictions),
            Self::Logistic(inner) => inner.transform_predictions_inplace(predictions),
            Self::Custom(inner) => inner.transform_predictions_inplace(predictions),
        }
    }

    fn default_metric(&self) -> Metric {
        match self {
            Self::Focal(inner) => inner.default_metric(),
            Self::Logistic(inner) => inner.default_metric(),
            Self::Custom(inner) => inner.default_metric(),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Focal(inner) => inner.name(),
            Self::Logistic(inner) => inner.name(),
            Self::Custom(inner) => inner.name(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
