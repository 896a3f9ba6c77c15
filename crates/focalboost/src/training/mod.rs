//! Training-side building blocks for focal loss boosting.
//!
//! ## Shared Infrastructure
//!
//! - [`Gradients`]: Interleaved gradient storage
//! - [`ObjectiveFn`]: Trait for computing gradients and base scores
//! - [`MetricFn`], [`Evaluator`], [`EvalSet`]: Evaluation during training
//! - [`EarlyStopping`]: Callback for stopping when a validation metric plateaus
//! - [`TrainingLogger`], [`Verbosity`]: Structured logging
//!
//! ## Objectives
//!
//! - [`FocalLoss`]: Focal loss for imbalanced binary classification
//! - [`LogisticLoss`]: Binary cross-entropy
//!
//! ## Metrics
//!
//! - [`FocalLossMetric`]: Mean focal loss on raw scores
//! - [`LogLoss`]: Binary cross-entropy on probabilities
//!
//! ## Boosting Library Callbacks
//!
//! - [`adapters`]: The two `(gradient, hessian)` / `(name, value, higher_is_better)`
//!   callback shapes that external boosting libraries call.

pub mod adapters;
mod callback;
mod eval;
mod gradients;
mod logger;
mod metrics;
mod objectives;

pub use callback::{EarlyStopAction, EarlyStopping};
pub use eval::{EvalSet, Evaluator, MetricValue};
pub use gradients::{GradsTuple, Gradients};
pub use logger::{TrainingLogger, Verbosity};
pub use metrics::{FocalLossMetric, LogLoss, Metric, MetricFn};
pub use objectives::{
    FocalLoss, LogisticLoss, Objective, ObjectiveFn, ObjectiveFnExt, PROB_EPS, PredictionKind,
};
