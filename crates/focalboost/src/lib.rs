//! focalboost: Focal loss as a gradient boosting objective.
//!
//! Provides the focal loss value, its gradient and hessian with respect to raw
//! scores, and a matching evaluation metric. Boosting libraries call these
//! through one of two callback shapes, both provided in [`training::adapters`].
//!
//! # Key Types
//!
//! - [`FocalLoss`] - The objective (loss, gradient, hessian, base score)
//! - [`FocalLossParams`] - `alpha` / `gamma` configuration with builder and serde
//! - [`FocalLossMetric`] - Mean focal loss for monitoring
//! - [`Dataset`] - Label/weight bundle passed to native-style callbacks
//!
//! # Quick Start
//!
//! ```
//! use focalboost::training::adapters::{evaluation_metric, objective};
//! use ndarray::array;
//!
//! let predictions = array![0.0f32, 0.0, 0.0];
//! let labels = array![1.0f32, 0.0, 1.0];
//!
//! let (grad, hess) = objective(predictions.view(), labels.view(), 0.25, 2.0).unwrap();
//! assert!(grad[0] < 0.0 && grad[1] > 0.0);
//! assert_eq!(hess.len(), 3);
//!
//! let (name, _value, higher_is_better) =
//!     evaluation_metric(predictions.view(), labels.view(), 0.25, 2.0).unwrap();
//! assert_eq!(name, "focal_loss");
//! assert!(!higher_is_better);
//! ```

// Re-export approx traits for users who want to compare gradients
pub use approx;

pub mod config;
pub mod data;
pub mod error;
pub mod numdiff;
pub mod training;
pub mod utils;

// =============================================================================
// Convenience Re-exports
// =============================================================================

pub use config::{Derivatives, FocalLossParams};
pub use data::{Dataset, TargetsView, WeightsView};
pub use error::{ConfigError, ObjectiveError, ParamValidationError};
pub use training::{
    FocalLoss, FocalLossMetric, GradsTuple, Gradients, LogLoss, LogisticLoss, Metric, MetricFn,
    Objective, ObjectiveFn, ObjectiveFnExt, PredictionKind,
};
pub use utils::{Parallelism, run_with_threads};
