//! Read-only views over labels and sample weights.

use ndarray::ArrayView1;

// =============================================================================
// TargetsView
// =============================================================================

/// Read-only view into binary target values.
///
/// Shape: `[n_samples]`.
#[derive(Clone, Copy)]
pub struct TargetsView<'a> {
    data: ArrayView1<'a, f32>,
}

impl<'a> TargetsView<'a> {
    /// Create a new targets view.
    pub fn new(data: ArrayView1<'a, f32>) -> Self {
        Self { data }
    }

    /// Number of samples.
    #[inline]
    pub fn n_samples(&self) -> usize {
        self.data.len()
    }

    /// Get the target value for a sample.
    #[inline]
    pub fn get(&self, sample: usize) -> f32 {
        self.data[sample]
    }

    /// Get the underlying array view.
    #[inline]
    pub fn view(&self) -> ArrayView1<'a, f32> {
        self.data
    }
}

impl<'a> From<ArrayView1<'a, f32>> for TargetsView<'a> {
    fn from(data: ArrayView1<'a, f32>) -> Self {
        Self::new(data)
    }
}

impl std::fmt::Debug for TargetsView<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TargetsView")
            .field("n_samples", &self.n_samples())
            .finish()
    }
}

// =============================================================================
// WeightsView
// =============================================================================

/// Read-only view into sample weights.
///
/// Handles both weighted and unweighted cases uniformly.
/// Unweighted samples are treated as having weight 1.0.
///
/// # Example
///
/// ```
/// use focalboost::data::WeightsView;
/// use ndarray::array;
///
/// // No weights (all 1.0)
/// let uniform = WeightsView::none();
/// assert_eq!(uniform.get(0), 1.0);
///
/// // Custom weights
/// let weights = array![0.5, 2.0, 1.5];
/// let weighted = WeightsView::from_array(weights.view());
/// assert_eq!(weighted.get(1), 2.0);
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub enum WeightsView<'a> {
    /// No weights - all samples have implicit weight 1.0.
    #[default]
    None,
    /// Explicit weights per sample.
    Some(ArrayView1<'a, f32>),
}

impl<'a> WeightsView<'a> {
    /// Create an empty weights view (all weights are 1.0).
    #[inline]
    pub fn none() -> Self {
        WeightsView::None
    }

    /// Create from weights array.
    #[inline]
    pub fn from_array(weights: ArrayView1<'a, f32>) -> Self {
        WeightsView::Some(weights)
    }

    /// Create from optional array.
    #[inline]
    pub fn from_optional(weights: Option<ArrayView1<'a, f32>>) -> Self {
        match weights {
            Some(w) => WeightsView::Some(w),
            None => WeightsView::None,
        }
    }

    /// Get weight for a sample.
    #[inline]
    pub fn get(&self, idx: usize) -> f32 {
        match self {
            WeightsView::None => 1.0,
            WeightsView::Some(w) => w[idx],
        }
    }

    /// Returns true if no weights are specified (all 1.0).
    #[inline]
    pub fn is_none(&self) -> bool {
        matches!(self, WeightsView::None)
    }

    /// Get the underlying array view if weighted.
    #[inline]
    pub fn as_array(&self) -> Option<ArrayView1<'a, f32>> {
        match self {
            WeightsView::None => None,
            WeightsView::Some(w) => Some(*w),
        }
    }

    /// Iterate over weights for `n_samples` samples.
    ///
    /// For uniform weights, yields 1.0 for each sample. `n_samples` is
    /// required because `WeightsView::None` has no length information.
    #[inline]
    pub fn iter(self, n_samples: usize) -> WeightsIter<'a> {
        match self {
            WeightsView::None => WeightsIter::Uniform {
                remaining: n_samples,
            },
            WeightsView::Some(w) => {
                debug_assert_eq!(w.len(), n_samples, "weights length mismatch");
                WeightsIter::Weighted { view: w, idx: 0 }
            }
        }
    }
}

/// Iterator over weights.
pub enum WeightsIter<'a> {
    Uniform { remaining: usize },
    Weighted { view: ArrayView1<'a, f32>, idx: usize },
}

impl Iterator for WeightsIter<'_> {
    type Item = f32;

    #[inline]
    fn next(&mut self) -> Option<f32> {
        match self {
            WeightsIter::Uniform { remaining } => {
                if *remaining == 0 {
                    None
                } else {
                    *remaining -= 1;
                    Some(1.0)
                }
            }
            WeightsIter::Weighted { view, idx } => {
                let w = view.get(*idx).copied();
                *idx += 1;
                w
            }
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = match self {
            WeightsIter::Uniform { remaining } => *remaining,
            WeightsIter::Weighted { view, idx } => view.len().saturating_sub(*idx),
        };
        (n, Some(n))
    }
}

impl ExactSizeIterator for WeightsIter<'_> {}
