//! Evaluation utilities for training.
//!
//! Provides the [`Evaluator`] component for computing metrics during training,
//! and [`MetricValue`] for wrapping computed metrics with metadata.

use ndarray::{ArrayView1, ArrayViewMut1};

use super::metrics::MetricFn;
use super::objectives::{ObjectiveFn, PredictionKind, validate_binary_inputs};
use crate::data::{Dataset, TargetsView, WeightsView};
use crate::error::ObjectiveError;

// =============================================================================
// MetricValue
// =============================================================================

/// A computed metric value with metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricValue {
    /// Name of the metric (e.g., "train-focal_loss", "valid-logloss").
    pub name: String,
    /// The computed value.
    pub value: f64,
    /// Whether higher values are better.
    pub higher_is_better: bool,
}

impl MetricValue {
    pub fn new(name: impl Into<String>, value: f64, higher_is_better: bool) -> Self {
        Self {
            name: name.into(),
            value,
            higher_is_better,
        }
    }

    /// Returns true if this value is better than another.
    pub fn is_better_than(&self, other: &Self) -> bool {
        if self.higher_is_better {
            self.value > other.value
        } else {
            self.value < other.value
        }
    }
}

impl std::fmt::Display for MetricValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {:.6}", self.name, self.value)
    }
}

// =============================================================================
// EvalSet
// =============================================================================

/// Named evaluation dataset.
#[derive(Debug, Clone, Copy)]
pub struct EvalSet<'a> {
    pub name: &'a str,
    pub dataset: &'a Dataset,
}

impl<'a> EvalSet<'a> {
    pub fn new(name: &'a str, dataset: &'a Dataset) -> Self {
        Self { name, dataset }
    }
}

// =============================================================================
// Evaluator
// =============================================================================

/// Computes a metric on raw scores, transforming them first when the metric
/// expects probabilities.
///
/// Inputs are validated the same way objectives validate them, so a metric
/// never sees mismatched lengths, non-binary labels or NaN scores.
///
/// # Example
///
/// ```
/// use focalboost::training::{Evaluator, FocalLoss, LogLoss};
/// use focalboost::{TargetsView, WeightsView};
/// use ndarray::array;
///
/// let objective = FocalLoss::default();
/// let metric = LogLoss;
/// let mut evaluator = Evaluator::new(&objective, &metric);
///
/// let preds = array![0.0f32, 0.0];
/// let labels = array![1.0f32, 0.0];
/// let value = evaluator
///     .evaluate(preds.view(), TargetsView::new(labels.view()), WeightsView::None)
///     .unwrap();
/// assert!((value - std::f64::consts::LN_2).abs() < 1e-6);
/// ```
pub struct Evaluator<'a, O: ObjectiveFn, M: MetricFn> {
    objective: &'a O,
    metric: &'a M,
    transform_buffer: Vec<f32>,
}

impl<'a, O: ObjectiveFn, M: MetricFn> Evaluator<'a, O, M> {
    /// Create a new evaluator.
    ///
    /// # Arguments
    ///
    /// * `objective` - The objective function (for prediction transforms)
    /// * `metric` - The metric to compute
    pub fn new(objective: &'a O, metric: &'a M) -> Self {
        Self {
            objective,
            metric,
            transform_buffer: Vec::new(),
        }
    }

    /// Whether higher metric values are better.
    pub fn higher_is_better(&self) -> bool {
        self.metric.higher_is_better()
    }

    /// The metric name.
    pub fn metric_name(&self) -> &'static str {
        self.metric.name()
    }

    /// Whether the metric is enabled.
    ///
    /// When `false`, evaluation should be skipped entirely.
    pub fn is_enabled(&self) -> bool {
        self.metric.is_enabled()
    }

    /// Compute a single metric value on raw scores.
    pub fn evaluate(
        &mut self,
        predictions: ArrayView1<'_, f32>,
        targets: TargetsView<'_>,
        weights: WeightsView<'_>,
    ) -> Result<f64, ObjectiveError> {
        validate_binary_inputs(predictions, targets, weights)?;

        if self.metric.expected_prediction_kind() == PredictionKind::Margin {
            return self.metric.compute(predictions, targets, weights);
        }

        let n_rows = predictions.len();
        self.transform_buffer.clear();
        self.transform_buffer.extend(predictions.iter().copied());
        self.objective
            .transform_predictions_inplace(ArrayViewMut1::from(&mut self.transform_buffer[..n_rows]));
        let transformed = ArrayView1::from(&self.transform_buffer[..n_rows]);
        self.metric.compute(transformed, targets, weights)
    }

    /// Evaluate raw scores on a named dataset.
    ///
    /// The result is named `"{set}-{metric}"`.
    pub fn evaluate_set(
        &mut self,
        eval_set: &EvalSet<'_>,
        predictions: ArrayView1<'_, f32>,
    ) -> Result<MetricValue, ObjectiveError> {
        let dataset = eval_set.dataset;
        let value = self.evaluate(predictions, dataset.targets(), dataset.weights())?;
        Ok(MetricValue::new(
            format!("{}-{}", eval_set.name, self.metric_name()),
            value,
            self.higher_is_better(),
        ))
    }
}
