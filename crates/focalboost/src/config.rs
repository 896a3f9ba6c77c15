//! Focal loss configuration with builder pattern.
//!
//! [`FocalLossParams`] holds the two hyperparameters of the focal loss and the
//! derivative mode. It uses the `bon` crate for a builder that validates at
//! build time, and `serde` so parameters can be loaded from JSON.
//!
//! # Example
//!
//! ```
//! use focalboost::config::{Derivatives, FocalLossParams};
//!
//! // All defaults: alpha = 0.25, gamma = 2.0, analytic derivatives
//! let params = FocalLossParams::builder().build().unwrap();
//!
//! // Finite-difference derivatives with a custom step
//! let params = FocalLossParams::builder()
//!     .alpha(0.5)
//!     .gamma(1.0)
//!     .derivatives(Derivatives::Numeric { step: 1e-3 })
//!     .build()
//!     .unwrap();
//!
//! // From JSON
//! let params = FocalLossParams::from_json(r#"{"alpha": 0.4, "gamma": 0.0}"#).unwrap();
//! assert_eq!(params.alpha, 0.4);
//! ```

use bon::Builder;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ParamValidationError};

/// Default step for central finite differences.
pub const DEFAULT_FD_STEP: f64 = 1e-4;

fn default_fd_step() -> f64 {
    DEFAULT_FD_STEP
}

// =============================================================================
// Derivatives
// =============================================================================

/// How the gradient and hessian are obtained from the loss.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum Derivatives {
    /// Closed-form first and second derivatives.
    #[default]
    Analytic,
    /// Central finite differences of the loss with a fixed step.
    Numeric {
        #[serde(default = "default_fd_step")]
        step: f64,
    },
}

impl Derivatives {
    /// Finite differences with [`DEFAULT_FD_STEP`].
    pub fn numeric() -> Self {
        Self::Numeric {
            step: DEFAULT_FD_STEP,
        }
    }
}

// =============================================================================
// FocalLossParams
// =============================================================================

/// Focal loss hyperparameters.
///
/// Fixed for the lifetime of a training run.
#[derive(Debug, Clone, Copy, PartialEq, Builder, Serialize, Deserialize)]
#[builder(
    derive(Clone, Debug),
    finish_fn(vis = "", name = __build_internal)
)]
#[serde(default, deny_unknown_fields)]
pub struct FocalLossParams {
    /// Class-balance weight for positive examples, in [0, 1]. Default: 0.25.
    ///
    /// Negatives are weighted by `1 - alpha`.
    #[builder(default = 0.25)]
    pub alpha: f32,

    /// Focusing parameter, >= 0. Default: 2.0.
    ///
    /// `gamma = 0` reduces to alpha-weighted cross-entropy.
    #[builder(default = 2.0)]
    pub gamma: f32,

    /// Derivative mode. Default: analytic.
    #[builder(default)]
    pub derivatives: Derivatives,
}

/// Custom finishing function that validates the params.
impl<S: focal_loss_params_builder::IsComplete> FocalLossParamsBuilder<S> {
    /// Build and validate the parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ParamValidationError`] if `alpha` is outside [0, 1], `gamma`
    /// is negative or non-finite, or a numeric step is not positive.
    pub fn build(self) -> Result<FocalLossParams, ParamValidationError> {
        let params = self.__build_internal();
        params.validate()?;
        Ok(params)
    }
}

impl Default for FocalLossParams {
    fn default() -> Self {
        Self {
            alpha: 0.25,
            gamma: 2.0,
            derivatives: Derivatives::Analytic,
        }
    }
}

impl FocalLossParams {
    /// Validate the parameters.
    pub fn validate(&self) -> Result<(), ParamValidationError> {
        if !(0.0..=1.0).contains(&self.alpha) {
            return Err(ParamValidationError::InvalidAlpha(self.alpha));
        }
        if !self.gamma.is_finite() || self.gamma < 0.0 {
            return Err(ParamValidationError::InvalidGamma(self.gamma));
        }
        if let Derivatives::Numeric { step } = self.derivatives {
            if !step.is_finite() || step <= 0.0 {
                return Err(ParamValidationError::InvalidStep(step));
            }
        }
        Ok(())
    }

    /// Parse and validate parameters from a JSON document.
    ///
    /// Missing fields take their defaults; unknown fields are rejected.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let params: Self = serde_json::from_str(json)?;
        params.validate()?;
        Ok(params)
    }

    /// Serialize to a JSON string.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string(self)?)
    }
}

// =============================================================================
// Tests
// =============================================================================
