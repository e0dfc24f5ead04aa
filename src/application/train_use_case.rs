// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates one full training run, in order:
//
//   Step 1: Load the weather CSV          (Layer 4 - data)
//   Step 2: Screen out unusable rows      (Layer 4 - data)
//   Step 3: Split train/validation        (Layer 4 - data)
//   Step 4: Build Burn datasets           (Layer 4 - data)
//   Step 5: Run the training loop         (Layer 5 - ml)
//   Step 6: Save a checkpoint (optional)  (Layer 6 - infra)
//
// The dataset is re-read on every run; nothing is cached.

use anyhow::{bail, Result};
use chrono::Utc;
use rand::{rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::data::{
    dataset::WeatherDataset,
    loader::CsvWeatherLoader,
    quality::screen,
    splitter::{split_holdout_tail, split_train_val},
};
use crate::domain::traits::RecordSource;
use crate::infra::{
    checkpoint::CheckpointManager,
    metrics::{MetricsLogger, TrainingSummary},
};
use crate::ml::{inferencer::Inferencer, trainer::run_training};

// ─── Training Configuration ──────────────────────────────────────────────────
// All hyperparameters for a training run. Serialisable so it can
// be written next to a checkpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainConfig {
    pub dataset_path:         String,
    pub checkpoint_dir:       Option<String>,
    pub epochs:               usize,
    pub batch_size:           usize,
    pub lr:                   f64,
    /// Fraction of rows held out for validation
    pub validation_split:     f64,
    /// Shuffle rows before splitting instead of holding out the tail
    pub shuffle_before_split: bool,
    /// Fixed seed for shuffling; random per run when None
    pub seed:                 Option<u64>,
    pub num_workers:          usize,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            dataset_path:         "seattle-weather.csv".to_string(),
            checkpoint_dir:       None,
            epochs:               50,
            batch_size:           32,
            lr:                   1e-3,
            validation_split:     0.2,
            shuffle_before_split: false,
            seed:                 None,
            num_workers:          1,
        }
    }
}

impl TrainConfig {
    pub fn validate(&self) -> Result<()> {
        if self.epochs == 0 {
            bail!("epochs must be at least 1");
        }
        if self.batch_size == 0 {
            bail!("batch_size must be at least 1");
        }
        if self.lr.is_nan() || self.lr <= 0.0 {
            bail!("learning rate must be positive, got {}", self.lr);
        }
        if !(0.0..1.0).contains(&self.validation_split) {
            bail!("validation_split must be in [0, 1), got {}", self.validation_split);
        }
        if self.num_workers == 0 {
            bail!("num_workers must be at least 1");
        }
        Ok(())
    }
}

/// Result of a successful run, ready to be served.
pub struct TrainedModel {
    pub inferencer: Inferencer,
    pub summary:    TrainingSummary,
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TrainConfig {
        &self.config
    }

    /// Train on the CSV file named in the config.
    pub fn execute(&self) -> Result<TrainedModel> {
        let loader = CsvWeatherLoader::new(&self.config.dataset_path);
        self.execute_with(&loader)
    }

    /// Train on records from any source.
    pub fn execute_with(&self, source: &dyn RecordSource) -> Result<TrainedModel> {
        let cfg = &self.config;
        cfg.validate()?;
        let started_at = Utc::now();

        // ── Step 1: Load every row ────────────────────────────────────────────
        let records = source.load_all()?;

        // ── Step 2: Screen out -1 labels and NaN features (with warnings) ─────
        let (usable, quality) = screen(records);
        if usable.is_empty() {
            bail!(
                "No usable training rows ({} rows read, {} unknown labels, {} non-numeric)",
                quality.total_rows,
                quality.unknown_label_rows,
                quality.non_numeric_rows,
            );
        }

        // ── Step 3: Train / validation split ──────────────────────────────────
        let (train_rows, val_rows) = if cfg.shuffle_before_split {
            let mut rng = match cfg.seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None       => StdRng::from_entropy(),
            };
            split_train_val(usable, 1.0 - cfg.validation_split, &mut rng)
        } else {
            split_holdout_tail(usable, cfg.validation_split)
        };
        if train_rows.is_empty() {
            bail!("Validation split {} leaves no training rows", cfg.validation_split);
        }
        tracing::info!(
            "Split: {} train, {} validation",
            train_rows.len(),
            val_rows.len()
        );

        // ── Step 4: Build Burn datasets ───────────────────────────────────────
        let train_dataset = WeatherDataset::from_records(&train_rows)?;
        let val_dataset   = WeatherDataset::from_records(&val_rows)?;

        // ── Step 5: Run training loop (Layer 5) ───────────────────────────────
        let ckpt_manager = cfg.checkpoint_dir.as_ref().map(CheckpointManager::new);
        let metrics = ckpt_manager
            .as_ref()
            .map(|c| MetricsLogger::new(c.dir(), started_at))
            .transpose()?;

        let outcome = run_training(cfg, train_dataset, val_dataset, metrics.as_ref())?;

        let summary = TrainingSummary {
            trained_at:    Utc::now(),
            epochs:        cfg.epochs,
            train_rows:    train_rows.len(),
            val_rows:      val_rows.len(),
            data_quality:  quality,
            final_metrics: outcome.final_metrics().cloned(),
        };

        // ── Step 6: Save checkpoint ───────────────────────────────────────────
        if let Some(ckpt) = &ckpt_manager {
            ckpt.save(&outcome.model, cfg, &summary)?;
        }

        Ok(TrainedModel {
            inferencer: Inferencer::new(outcome.model),
            summary,
        })
    }
}
