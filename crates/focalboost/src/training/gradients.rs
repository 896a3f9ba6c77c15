//! Gradient/hessian storage.
//!
//! Objectives write interleaved [`GradsTuple`] pairs into a caller-provided
//! buffer. [`Gradients`] owns such a buffer and splits it into the separate
//! gradient and hessian vectors that boosting callbacks return.

use ndarray::{Array1, ArrayView1, ArrayViewMut1};

/// Gradient and hessian pair for one sample.
///
/// - `grad`: First derivative (∂L/∂ŷ) - direction of steepest ascent
/// - `hess`: Second derivative (∂²L/∂ŷ²) - curvature information
///
/// # Example
///
/// ```
/// use focalboost::training::GradsTuple;
///
/// let gh = GradsTuple::new(0.5, 0.25);
/// assert_eq!(gh.newton_step(1e-6), -2.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GradsTuple {
    pub grad: f32,
    pub hess: f32,
}

impl GradsTuple {
    /// Zero gradient pair (neutral element for accumulation).
    pub const ZERO: Self = Self {
        grad: 0.0,
        hess: 0.0,
    };

    #[inline]
    pub fn new(grad: f32, hess: f32) -> Self {
        Self { grad, hess }
    }

    /// Add another gradient pair to this one (in-place).
    #[inline]
    pub fn accumulate(&mut self, other: &GradsTuple) {
        self.grad += other.grad;
        self.hess += other.hess;
    }

    /// Compute Newton step: -grad / hess (with safety clamp).
    ///
    /// The hessian is floored at `min_hess`, which also covers the negative
    /// curvature focal loss has on badly misclassified samples.
    #[inline]
    pub fn newton_step(&self, min_hess: f32) -> f32 {
        let hess_safe = self.hess.max(min_hess);
        -self.grad / hess_safe
    }
}

/// Owned gradient buffer for a batch of samples.
#[derive(Debug, Clone, PartialEq)]
pub struct Gradients {
    grad_hess: Array1<GradsTuple>,
}

impl Gradients {
    /// Create a zeroed buffer for `n_samples` samples.
    pub fn new(n_samples: usize) -> Self {
        Self {
            grad_hess: Array1::from_elem(n_samples, GradsTuple::ZERO),
        }
    }

    /// Number of samples.
    #[inline]
    pub fn n_samples(&self) -> usize {
        self.grad_hess.len()
    }

    /// Get the pair for a sample.
    #[inline]
    pub fn get(&self, sample: usize) -> GradsTuple {
        self.grad_hess[sample]
    }

    /// Read-only view of the interleaved pairs.
    #[inline]
    pub fn view(&self) -> ArrayView1<'_, GradsTuple> {
        self.grad_hess.view()
    }

    /// Mutable view for objectives to write into.
    #[inline]
    pub fn view_mut(&mut self) -> ArrayViewMut1<'_, GradsTuple> {
        self.grad_hess.view_mut()
    }

    /// Gradients as a separate vector.
    pub fn grads(&self) -> Array1<f32> {
        self.grad_hess.mapv(|gh| gh.grad)
    }

    /// Hessians as a separate vector.
    pub fn hessians(&self) -> Array1<f32> {
        self.grad_hess.mapv(|gh| gh.hess)
    }

    /// Split into `(gradient, hessian)` vectors.
    pub fn into_arrays(self) -> (Array1<f32>, Array1<f32>) {
        (self.grads(), self.hessians())
    }

    /// Sum of all pairs, accumulated in `f64`.
    pub fn sum(&self) -> (f64, f64) {
        self.grad_hess
            .iter()
            .fold((0.0f64, 0.0f64), |(g, h), gh| (g + gh.grad as f64, h + gh.hess as f64))
    }
}
