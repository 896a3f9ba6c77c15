//! Label and weight containers consumed by objectives and metrics.
//!
//! - [`TargetsView`]: borrowed binary labels
//! - [`WeightsView`]: borrowed optional sample weights
//! - [`Dataset`]: owned labels + weights, the bundle native callbacks receive

mod dataset;
mod views;

pub(crate) use dataset::check_weights;
pub use dataset::Dataset;
pub use views::{TargetsView, WeightsIter, WeightsView};
