// ============================================================
// Layer 5 — Training Loop
// ============================================================
// Train + validation loop using Burn's DataLoader and Adam.
//
//   - a fresh 4→8→16→5 classifier every run (no warm start)
//   - `epochs` full passes, training batches reshuffled each epoch
//   - validation is measured after every epoch and only reported;
//     all epochs run regardless of the validation trend
//   - the returned model is model.valid(), i.e. on InferBackend
//     with no autodiff graph attached
//
// Reference: Burn Book §5, Kingma & Ba (2015) Adam

use anyhow::Result;
use burn::{
    data::dataloader::DataLoaderBuilder,
    module::AutodiffModule,
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
};

use crate::application::train_use_case::TrainConfig;
use crate::data::{batcher::WeatherBatcher, dataset::WeatherDataset};
use crate::infra::metrics::{EpochMetrics, MetricsLogger};
use crate::ml::model::{WeatherClassifier, WeatherClassifierConfig};
use crate::ml::{InferBackend, TrainBackend};

/// A trained model plus its per-epoch history.
pub struct TrainingOutcome {
    pub model:   WeatherClassifier<InferBackend>,
    pub history: Vec<EpochMetrics>,
}

impl TrainingOutcome {
    pub fn final_metrics(&self) -> Option<&EpochMetrics> {
        self.history.last()
    }
}

/// Running sums for one pass over a data loader.
#[derive(Default)]
struct PassTotals {
    loss_sum: f64,
    correct:  usize,
    samples:  usize,
}

impl PassTotals {
    fn add(&mut self, batch_loss: f64, batch_correct: usize, batch_size: usize) {
        // Loss is a per-batch mean; weight it by batch size so the
        // short last batch doesn't count as much as a full one
        self.loss_sum += batch_loss * batch_size as f64;
        self.correct  += batch_correct;
        self.samples  += batch_size;
    }

    fn mean_loss(&self) -> Option<f64> {
        (self.samples > 0).then(|| self.loss_sum / self.samples as f64)
    }

    fn accuracy(&self) -> Option<f64> {
        (self.samples > 0).then(|| self.correct as f64 / self.samples as f64)
    }
}

pub fn run_training(
    cfg:           &TrainConfig,
    train_dataset: WeatherDataset,
    val_dataset:   WeatherDataset,
    metrics:       Option<&MetricsLogger>,
) -> Result<TrainingOutcome> {
    let device = <TrainBackend as Backend>::Device::default();
    tracing::debug!("Using device: {:?}", device);

    // ── Build model ───────────────────────────────────────────────────────────
    let mut model: WeatherClassifier<TrainBackend> = WeatherClassifierConfig::new().init(&device);

    // ── Adam optimiser ────────────────────────────────────────────────────────
    // m = β1*m + (1-β1)*g        (mean)
    // v = β2*v + (1-β2)*g²       (variance)
    // θ = θ - lr * m / (√v + ε)  (update)
    let mut optim = AdamConfig::new()
        .with_beta_1(0.9)
        .with_beta_2(0.999)
        .with_epsilon(1e-7)
        .init();

    // ── Training data loader (AutodiffBackend), reshuffled every epoch ───────
    let shuffle_seed = cfg.seed.unwrap_or_else(rand::random);
    let has_validation = val_dataset.sample_count() > 0;
    tracing::info!(
        "Training on {} rows, validating on {} rows, {} epochs (shuffle seed {})",
        train_dataset.sample_count(),
        val_dataset.sample_count(),
        cfg.epochs,
        shuffle_seed,
    );

    let train_loader = DataLoaderBuilder::new(WeatherBatcher)
        .batch_size(cfg.batch_size)
        .shuffle(shuffle_seed)
        .num_workers(cfg.num_workers)
        .build(train_dataset);

    // ── Validation data loader (InnerBackend — no autodiff overhead) ──────────
    let val_loader = DataLoaderBuilder::new(WeatherBatcher)
        .batch_size(cfg.batch_size)
        .num_workers(cfg.num_workers)
        .build(val_dataset);

    let mut history = Vec::with_capacity(cfg.epochs);

    // ── Epoch loop ────────────────────────────────────────────────────────────
    for epoch in 1..=cfg.epochs {

        // ── Training phase ────────────────────────────────────────────────────
        let mut train = PassTotals::default();

        for batch in train_loader.iter() {
            let batch_size = batch.targets.dims()[0];
            let (loss, logits) = model.forward_classification(
                batch.features,
                batch.targets.clone(),
            );
            let logits = logits.detach();

            let loss_val: f64 = loss.clone().into_scalar().elem::<f64>();
            let correct = count_correct(logits, batch.targets);
            train.add(loss_val, correct, batch_size);

            // Backward pass + Adam update
            let grads = loss.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model = optim.step(cfg.lr, model, grads);
        }

        // ── Validation phase ──────────────────────────────────────────────────
        let mut val = PassTotals::default();

        if has_validation {
            let model_valid = model.valid();

            for batch in val_loader.iter() {
                let batch_size = batch.targets.dims()[0];
                let (loss, logits) = model_valid.forward_classification(
                    batch.features,
                    batch.targets.clone(),
                );
                let loss_val: f64 = loss.into_scalar().elem::<f64>();
                let correct = count_correct(logits, batch.targets);
                val.add(loss_val, correct, batch_size);
            }
        }

        let m = EpochMetrics::new(
            epoch,
            train.mean_loss().unwrap_or(f64::NAN),
            train.accuracy().unwrap_or(0.0),
            val.mean_loss(),
            val.accuracy(),
        );

        tracing::info!(
            "Epoch {:>3}/{} | train_loss={:.4} | train_acc={:.1}% | val_loss={} | val_acc={}",
            epoch,
            cfg.epochs,
            m.train_loss,
            m.train_acc * 100.0,
            m.val_loss.map(|v| format!("{v:.4}")).unwrap_or_else(|| "-".into()),
            m.val_acc.map(|v| format!("{:.1}%", v * 100.0)).unwrap_or_else(|| "-".into()),
        );

        if let Some(logger) = metrics {
            logger.log(&m)?;
        }
        history.push(m);
    }

    tracing::info!("Training complete after {} epochs", cfg.epochs);
    Ok(TrainingOutcome { model: model.valid(), history })
}

/// Number of rows whose argmax matches the target class.
fn count_correct<B: Backend>(logits: Tensor<B, 2>, targets: Tensor<B, 1, Int>) -> usize {
    // argmax(1) returns shape [batch, 1] — flatten to [batch]
    // before comparing with targets which is [batch]
    let predicted = logits.argmax(1).flatten::<1>(0, 1);
    let correct: i64 = predicted
        .equal(targets)
        .int()
        .sum()
        .into_scalar()
        .elem::<i64>();
    correct as usize
}
