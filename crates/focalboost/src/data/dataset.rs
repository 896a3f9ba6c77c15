//! Label/weight bundle handed to native-style training callbacks.

use ndarray::{Array1, ArrayView1};

use super::{TargetsView, WeightsView};
use crate::error::ObjectiveError;

/// Training or validation labels with optional sample weights.
///
/// Native boosting entry points pass the objective a dataset handle rather
/// than a bare label vector; this is that handle. Features are owned by the
/// host library and never reach the objective.
///
/// # Example
///
/// ```
/// use focalboost::data::Dataset;
/// use ndarray::array;
///
/// let dataset = Dataset::new(array![1.0, 0.0, 1.0])
///     .with_weights(array![1.0, 0.5, 2.0])
///     .unwrap();
/// assert_eq!(dataset.n_samples(), 3);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    labels: Array1<f32>,
    weights: Option<Array1<f32>>,
}

impl Dataset {
    /// Create an unweighted dataset.
    pub fn new(labels: Array1<f32>) -> Self {
        Self {
            labels,
            weights: None,
        }
    }

    /// Create an unweighted dataset from a label slice.
    pub fn from_labels(labels: &[f32]) -> Self {
        Self::new(Array1::from(labels.to_vec()))
    }

    /// Attach sample weights.
    ///
    /// # Errors
    ///
    /// Fails if the weight count differs from the label count, or any weight
    /// is negative or non-finite.
    pub fn with_weights(mut self, weights: Array1<f32>) -> Result<Self, ObjectiveError> {
        check_weights(weights.view(), self.labels.len())?;
        self.weights = Some(weights);
        Ok(self)
    }

    /// Number of samples.
    #[inline]
    pub fn n_samples(&self) -> usize {
        self.labels.len()
    }

    /// Label array.
    #[inline]
    pub fn labels(&self) -> ArrayView1<'_, f32> {
        self.labels.view()
    }

    /// Labels as a targets view.
    #[inline]
    pub fn targets(&self) -> TargetsView<'_> {
        TargetsView::new(self.labels.view())
    }

    /// Sample weights (uniform if none were attached).
    #[inline]
    pub fn weights(&self) -> WeightsView<'_> {
        WeightsView::from_optional(self.weights.as_ref().map(|w| w.view()))
    }
}

/// Check a weight array against the sample count.
pub(crate) fn check_weights(weights: ArrayView1<'_, f32>, n_samples: usize) -> Result<(), ObjectiveError> {
    if weights.len() != n_samples {
        return Err(ObjectiveError::WeightsLengthMismatch {
            weights: weights.len(),
            samples: n_samples,
        });
    }
    match weights.iter().position(|w| !w.is_finite() || *w < 0.0) {
        Some(index) => Err(ObjectiveError::InvalidWeight {
            index,
            value: weights[index],
        }),
        None => Ok(()),
    }
}
