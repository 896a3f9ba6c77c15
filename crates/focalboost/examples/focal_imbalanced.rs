//! Toy boosting loop on imbalanced data driven by the focal loss callbacks.
//!
//! Each round fits one additive score per feature bucket with a damped Newton
//! step, the way a depth-0 tree per bucket would. Training stops early once
//! the validation focal loss stops improving.
//!
//! Run with: `RUST_LOG=info cargo run --example focal_imbalanced`

use ndarray::Array1;
use rand::prelude::*;
use tracing_subscriber::EnvFilter;

use focalboost::training::adapters::{native_metric, native_objective};
use focalboost::training::{
    EarlyStopAction, EarlyStopping, EvalSet, Evaluator, MetricValue, TrainingLogger, Verbosity,
};
use focalboost::{Dataset, FocalLoss, FocalLossParams, GradsTuple, Metric, ObjectiveError, ObjectiveFn};

const N_BUCKETS: usize = 16;
const N_ROUNDS: usize = 200;
const LEARNING_RATE: f32 = 0.3;
const MIN_HESS: f32 = 1e-3;

/// One feature in [0, 1); positives concentrate near 1.
fn synthetic(n_rows: usize, rng: &mut StdRng) -> (Vec<f32>, Dataset) {
    let features: Vec<f32> = (0..n_rows).map(|_| rng.r#gen::<f32>()).collect();
    let labels: Vec<f32> = features
        .iter()
        .map(|&x| {
            let p_pos = 0.01 + 0.25 * x.powi(4);
            (rng.r#gen::<f32>() < p_pos) as u8 as f32
        })
        .collect();
    (features, Dataset::from_labels(&labels))
}

fn bucket(x: f32) -> usize {
    ((x * N_BUCKETS as f32) as usize).min(N_BUCKETS - 1)
}

fn predict(features: &[f32], base: f32, leaves: &[f32; N_BUCKETS]) -> Array1<f32> {
    features.iter().map(|&x| base + leaves[bucket(x)]).collect()
}

fn main() -> Result<(), ObjectiveError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut rng = StdRng::seed_from_u64(17);
    let (train_x, train) = synthetic(20_000, &mut rng);
    let (valid_x, valid) = synthetic(5_000, &mut rng);

    let params = FocalLossParams::builder().alpha(0.25).gamma(2.0).build()?;
    let loss = FocalLoss::from_params(&params)?;
    let gradients = native_objective(loss);
    let focal_metric = native_metric(loss);

    let base = loss.compute_base_score(train.targets(), train.weights())?;
    let mut leaves = [0.0f32; N_BUCKETS];

    let logloss = Metric::logloss();
    let mut evaluator = Evaluator::new(&loss, &logloss);
    let valid_set = EvalSet::new("valid", &valid);

    let mut early_stopping = EarlyStopping::new(10, false);
    let mut best_leaves = leaves;
    let mut logger = TrainingLogger::new(Verbosity::Info);
    logger.start_training(N_ROUNDS);
    logger.info(&format!("base score {base:.4}"));

    for round in 0..N_ROUNDS {
        let train_preds = predict(&train_x, base, &leaves);
        let (grad, hess) = gradients(train_preds.view(), &train)?;

        let mut sums = [GradsTuple::ZERO; N_BUCKETS];
        for ((&x, &g), &h) in train_x.iter().zip(grad.iter()).zip(hess.iter()) {
            sums[bucket(x)].accumulate(&GradsTuple::new(g, h));
        }
        for (leaf, sum) in leaves.iter_mut().zip(sums.iter()) {
            *leaf += LEARNING_RATE * sum.newton_step(MIN_HESS);
        }

        let valid_preds = predict(&valid_x, base, &leaves);
        let (name, value, higher_is_better) = focal_metric(valid_preds.view(), &valid)?;
        let metrics = [
            MetricValue::new(format!("valid-{name}"), value, higher_is_better),
            evaluator.evaluate_set(&valid_set, valid_preds.view())?,
        ];
        logger.log_metrics(round, &metrics);

        match early_stopping.update(value) {
            EarlyStopAction::Improved => best_leaves = leaves,
            EarlyStopAction::Stop => {
                logger.log_early_stopping(round, early_stopping.best_round(), name);
                break;
            }
            EarlyStopAction::Continue => {}
        }
    }
    logger.finish_training();

    let valid_preds = predict(&valid_x, base, &best_leaves);
    let (name, value, _) = focal_metric(valid_preds.view(), &valid)?;
    logger.info(&format!(
        "best round {} with valid-{name} {value:.6}",
        early_stopping.best_round()
    ));
    Ok(())
}
