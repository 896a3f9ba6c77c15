//! Error types.
//!
//! Invalid numerical input is the only failure class: mismatched lengths,
//! labels outside {0, 1}, bad weights, or hyperparameters outside their
//! domains. Extreme scores are not errors; they are clamped.

/// Hyperparameter validation error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParamValidationError {
    /// Alpha (class-balance weight) must be in [0, 1].
    #[error("alpha must be in [0, 1], got {0}")]
    InvalidAlpha(f32),

    /// Gamma (focusing parameter) must be finite and >= 0.
    #[error("gamma must be finite and >= 0, got {0}")]
    InvalidGamma(f32),

    /// Finite-difference step must be finite and > 0.
    #[error("finite-difference step must be finite and > 0, got {0}")]
    InvalidStep(f64),
}

/// Errors raised when evaluating an objective or metric on a batch.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ObjectiveError {
    #[error("length mismatch: {predictions} predictions vs {labels} labels")]
    LengthMismatch { predictions: usize, labels: usize },

    #[error("predictions and labels must be non-empty")]
    EmptyInput,

    #[error("label at index {index} must be 0 or 1, got {value}")]
    InvalidLabel { index: usize, value: f32 },

    #[error("prediction at index {index} is NaN")]
    NanPrediction { index: usize },

    #[error("weights length {weights} does not match {samples} samples")]
    WeightsLengthMismatch { weights: usize, samples: usize },

    #[error("weight at index {index} must be finite and >= 0, got {value}")]
    InvalidWeight { index: usize, value: f32 },

    #[error("gradient buffer has {got} slots, expected {expected}")]
    BufferLengthMismatch { expected: usize, got: usize },

    #[error(transparent)]
    Params(#[from] ParamValidationError),
}

/// Errors that can occur when loading a configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(#[from] ParamValidationError),
}
