//! Training progress logging.
//!
//! Events go through `tracing`; install a subscriber (for example
//! `tracing_subscriber::fmt`) to see them. [`Verbosity`] filters at the
//! source so silent runs do no formatting work.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use super::eval::MetricValue;

/// Verbosity level for training output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verbosity {
    /// No output.
    #[default]
    Silent,
    /// Errors and warnings only.
    Warning,
    /// Progress and important information.
    Info,
    /// Detailed debugging information.
    Debug,
}

/// Structured logger for a training run.
#[derive(Debug)]
pub struct TrainingLogger {
    verbosity: Verbosity,
    n_rounds: usize,
    start: Option<Instant>,
}

impl TrainingLogger {
    pub fn new(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            n_rounds: 0,
            start: None,
        }
    }

    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    #[inline]
    fn enabled(&self, level: Verbosity) -> bool {
        self.verbosity >= level
    }

    pub fn start_training(&mut self, n_rounds: usize) {
        self.n_rounds = n_rounds;
        self.start = Some(Instant::now());
        if self.enabled(Verbosity::Info) {
            tracing::info!(n_rounds, "starting training");
        }
    }

    /// Log all metric values of one round on a single line.
    pub fn log_metrics(&self, round: usize, metrics: &[MetricValue]) {
        if metrics.is_empty() {
            return;
        }
        if self.enabled(Verbosity::Info) {
            let line = metrics.iter().map(ToString::to_string).collect::<Vec<_>>().join("  ");
            tracing::info!(round, n_rounds = self.n_rounds, "{line}");
        }
        if self.enabled(Verbosity::Debug) {
            for metric in metrics {
                tracing::debug!(round, name = %metric.name, value = metric.value, "metric");
            }
        }
    }

    pub fn log_early_stopping(&self, round: usize, best_round: usize, metric_name: &str) {
        if self.enabled(Verbosity::Info) {
            tracing::info!(round, best_round, metric = metric_name, "early stopping");
        }
    }

    pub fn finish_training(&self) {
        if self.enabled(Verbosity::Info) {
            let elapsed_ms = self.start.map_or(0, |s| s.elapsed().as_millis());
            tracing::info!(elapsed_ms = elapsed_ms as u64, "training finished");
        }
    }

    pub fn info(&self, message: &str) {
        if self.enabled(Verbosity::Info) {
            tracing::info!("{message}");
        }
    }

    pub fn warn(&self, message: &str) {
        if self.enabled(Verbosity::Warning) {
            tracing::warn!("{message}");
        }
    }

    pub fn debug(&self, message: &str) {
        if self.enabled(Verbosity::Debug) {
            tracing::debug!("{message}");
        }
    }
}
