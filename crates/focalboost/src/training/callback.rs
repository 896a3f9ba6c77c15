//! Early stopping callback for training.
//!
//! Monitors a validation metric and stops training when no improvement is seen
//! for a specified number of rounds.

/// What a training loop should do after an early stopping update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EarlyStopAction {
    /// No improvement, but still within patience.
    Continue,
    /// New best value recorded this round.
    Improved,
    /// Patience exhausted.
    Stop,
}

/// Early stopping configuration and state.
///
/// Monitors a validation metric during training and signals when to stop
/// based on lack of improvement over a patience window. A patience of `0`
/// disables early stopping.
///
/// # Example
///
/// ```
/// use focalboost::training::{EarlyStopAction, EarlyStopping};
///
/// // Focal loss: lower is better
/// let mut early_stop = EarlyStopping::new(2, false);
///
/// for (round, value) in [0.30, 0.25, 0.26, 0.27, 0.28].into_iter().enumerate() {
///     if early_stop.update(value) == EarlyStopAction::Stop {
///         assert_eq!(round, 3);
///         break;
///     }
/// }
/// assert_eq!(early_stop.best_round(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct EarlyStopping {
    /// Number of rounds without improvement before stopping.
    patience: usize,
    /// Best metric value seen so far.
    best_value: Option<f64>,
    /// Round at which best value was observed.
    best_round: usize,
    /// Current round.
    current_round: usize,
    /// Whether higher metric values are better.
    higher_is_better: bool,
}

impl EarlyStopping {
    /// Create a new early stopping callback.
    ///
    /// # Arguments
    ///
    /// * `patience` - Number of rounds without improvement before stopping
    /// * `higher_is_better` - Whether higher metric values indicate improvement
    pub fn new(patience: usize, higher_is_better: bool) -> Self {
        Self {
            patience,
            best_value: None,
            best_round: 0,
            current_round: 0,
            higher_is_better,
        }
    }

    /// Whether early stopping is active.
    pub fn is_enabled(&self) -> bool {
        self.patience > 0
    }

    /// Record the metric value for the current round.
    ///
    /// NaN values never count as an improvement.
    pub fn update(&mut self, value: f64) -> EarlyStopAction {
        let is_improvement = !value.is_nan()
            && match self.best_value {
                None => true,
                Some(best) if self.higher_is_better => value > best,
                Some(best) => value < best,
            };

        if is_improvement {
            self.best_value = Some(value);
            self.best_round = self.current_round;
        }

        self.current_round += 1;

        if is_improvement {
            EarlyStopAction::Improved
        } else if self.is_enabled() && self.current_round - self.best_round > self.patience {
            EarlyStopAction::Stop
        } else {
            EarlyStopAction::Continue
        }
    }

    /// Update and return `true` if training should stop.
    pub fn should_stop(&mut self, value: f64) -> bool {
        self.update(value) == EarlyStopAction::Stop
    }

    /// Get the best metric value observed.
    pub fn best_value(&self) -> Option<f64> {
        self.best_value
    }

    /// Get the round at which the best value was observed.
    pub fn best_round(&self) -> usize {
        self.best_round
    }

    /// Get the current round number.
    pub fn current_round(&self) -> usize {
        self.current_round
    }

    /// Reset the early stopping state.
    pub fn reset(&mut self) {
        self.best_value = None;
        self.best_round = 0;
        self.current_round = 0;
    }
}
