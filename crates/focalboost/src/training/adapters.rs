//! Callback shapes expected by boosting libraries.
//!
//! Two canonical functions compute everything:
//!
//! - [`objective`]: `(predictions, labels, alpha, gamma) -> (gradient, hessian)`
//! - [`evaluation_metric`]: `(predictions, labels, alpha, gamma) -> (name, value, higher_is_better)`
//!
//! The adapters bind a configured [`FocalLoss`] and reorder arguments for the
//! two common calling conventions:
//!
//! | Convention | Arguments | Weights |
//! |------------|-----------|---------|
//! | native     | `(predictions, &Dataset)` | from the dataset |
//! | estimator  | `(labels, predictions)`   | unweighted |
//!
//! # Example
//!
//! ```
//! use focalboost::training::adapters::{estimator_objective, native_objective};
//! use focalboost::{Dataset, FocalLoss};
//! use ndarray::array;
//!
//! let loss = FocalLoss::new(0.25, 2.0).unwrap();
//! let native = native_objective(loss);
//! let estimator = estimator_objective(loss);
//!
//! let dataset = Dataset::from_labels(&[1.0, 0.0]);
//! let preds = array![0.3f32, -1.2];
//!
//! let (g1, h1) = native(preds.view(), &dataset).unwrap();
//! let (g2, h2) = estimator(dataset.labels(), preds.view()).unwrap();
//! assert_eq!(g1, g2);
//! assert_eq!(h1, h2);
//! ```

use ndarray::{Array1, ArrayView1};

use super::metrics::{FocalLossMetric, MetricFn};
use super::objectives::{FocalLoss, ObjectiveFnExt, validate_binary_inputs};
use crate::data::{Dataset, TargetsView, WeightsView};
use crate::error::ObjectiveError;

/// Separate `(gradient, hessian)` vectors.
pub type GradHess = (Array1<f32>, Array1<f32>);

/// `(metric_name, metric_value, higher_is_better)`.
pub type EvalResult = (&'static str, f64, bool);

// =============================================================================
// Canonical Operations
// =============================================================================

/// Gradient and hessian of focal loss for every prediction.
///
/// `predictions` are raw scores, `labels` are 0 or 1.
pub fn objective(
    predictions: ArrayView1<'_, f32>,
    labels: ArrayView1<'_, f32>,
    alpha: f32,
    gamma: f32,
) -> Result<GradHess, ObjectiveError> {
    let loss = FocalLoss::new(alpha, gamma)?;
    grad_hess(&loss, predictions, TargetsView::new(labels), WeightsView::None)
}

/// Mean focal loss, reported as `("focal_loss", value, false)`.
pub fn evaluation_metric(
    predictions: ArrayView1<'_, f32>,
    labels: ArrayView1<'_, f32>,
    alpha: f32,
    gamma: f32,
) -> Result<EvalResult, ObjectiveError> {
    let loss = FocalLoss::new(alpha, gamma)?;
    eval_result(&loss, predictions, TargetsView::new(labels), WeightsView::None)
}

fn grad_hess(
    loss: &FocalLoss,
    predictions: ArrayView1<'_, f32>,
    targets: TargetsView<'_>,
    weights: WeightsView<'_>,
) -> Result<GradHess, ObjectiveError> {
    Ok(loss.compute_gradients(predictions, targets, weights)?.into_arrays())
}

fn eval_result(
    loss: &FocalLoss,
    predictions: ArrayView1<'_, f32>,
    targets: TargetsView<'_>,
    weights: WeightsView<'_>,
) -> Result<EvalResult, ObjectiveError> {
    validate_binary_inputs(predictions, targets, weights)?;
    let metric = FocalLossMetric::new(*loss);
    let value = metric.compute(predictions, targets, weights)?;
    Ok((metric.name(), value, metric.higher_is_better()))
}

// =============================================================================
// Native Convention: (predictions, dataset)
// =============================================================================

/// Objective callback taking `(predictions, &Dataset)`. Dataset weights apply.
pub fn native_objective(
    loss: FocalLoss,
) -> impl Fn(ArrayView1<'_, f32>, &Dataset) -> Result<GradHess, ObjectiveError> + Send + Sync {
    move |predictions: ArrayView1<'_, f32>, dataset: &Dataset| {
        grad_hess(&loss, predictions, dataset.targets(), dataset.weights())
    }
}

/// Metric callback taking `(predictions, &Dataset)`. Dataset weights apply.
pub fn native_metric(
    loss: FocalLoss,
) -> impl Fn(ArrayView1<'_, f32>, &Dataset) -> Result<EvalResult, ObjectiveError> + Send + Sync {
    move |predictions: ArrayView1<'_, f32>, dataset: &Dataset| {
        eval_result(&loss, predictions, dataset.targets(), dataset.weights())
    }
}

// =============================================================================
// Estimator Convention: (labels, predictions)
// =============================================================================

/// Objective callback taking `(labels, predictions)`. Unweighted.
pub fn estimator_objective(
    loss: FocalLoss,
) -> impl Fn(ArrayView1<'_, f32>, ArrayView1<'_, f32>) -> Result<GradHess, ObjectiveError> + Send + Sync
{
    move |labels: ArrayView1<'_, f32>, predictions: ArrayView1<'_, f32>| {
        grad_hess(&loss, predictions, TargetsView::new(labels), WeightsView::None)
    }
}

/// Metric callback taking `(labels, predictions)`. Unweighted.
pub fn estimator_metric(
    loss: FocalLoss,
) -> impl Fn(ArrayView1<'_, f32>, ArrayView1<'_, f32>) -> Result<EvalResult, ObjectiveError> + Send + Sync
{
    move |labels: ArrayView1<'_, f32>, predictions: ArrayView1<'_, f32>| {
        eval_result(&loss, predictions, TargetsView::new(labels), WeightsView::None)
    }
}
