// ============================================================
// Layer 6 — Checkpoint Manager
// ============================================================
// Saves and restores a trained classifier using Burn's named
// MessagePack file recorder at full precision (the compact
// recorder stores f16, which shifts predictions slightly), plus
// the JSON files needed to make sense of it.
//
// File layout:
//   checkpoints/
//     model.mpk              ← weights (MessagePack, f32)
//     model_config.json      ← WeatherClassifierConfig (architecture)
//     train_config.json      ← hyperparameters of the run
//     training_summary.json  ← TrainingSummary (quality + metrics)
//     metrics.csv            ← per-epoch metrics (MetricsLogger)
//
// A checkpoint is only considered present once the summary has
// been written. Saving removes the old summary first and writes
// the new one last.
//
// Reference: Burn Book §5 (Records and Checkpointing)

use anyhow::{Context, Result};
use std::{fs, path::{Path, PathBuf}};
use burn::{
    prelude::*,
    record::{FullPrecisionSettings, NamedMpkFileRecorder, Recorder},
};
use serde::{de::DeserializeOwned, Serialize};

use crate::application::train_use_case::TrainConfig;
use crate::infra::metrics::TrainingSummary;
use crate::ml::model::{WeatherClassifier, WeatherClassifierConfig};

const MODEL_FILE:         &str = "model";
const MODEL_CONFIG_FILE:  &str = "model_config.json";
const TRAIN_CONFIG_FILE:  &str = "train_config.json";
const SUMMARY_FILE:       &str = "training_summary.json";

type ModelRecorder = NamedMpkFileRecorder<FullPrecisionSettings>;

/// Manages saving and loading of model checkpoints.
/// All files are stored in the configured directory.
#[derive(Debug, Clone)]
pub struct CheckpointManager {
    dir: PathBuf,
}

impl CheckpointManager {
    /// Create a manager for `dir`. The directory is created on first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// True once a complete checkpoint has been written.
    pub fn exists(&self) -> bool {
        self.dir.join(SUMMARY_FILE).is_file()
    }

    /// Write weights, architecture, hyperparameters and summary.
    pub fn save<B: Backend>(
        &self,
        model:   &WeatherClassifier<B>,
        cfg:     &TrainConfig,
        summary: &TrainingSummary,
    ) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create checkpoint dir '{}'", self.dir.display()))?;

        // The summary marks a complete checkpoint; drop the old one so a
        // failed overwrite is never restored as the previous run
        let summary_path = self.dir.join(SUMMARY_FILE);
        match fs::remove_file(&summary_path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Cannot replace '{}'", summary_path.display())
                })
            }
        }

        // Recorder adds the file extension itself
        let path = self.dir.join(MODEL_FILE);
        ModelRecorder::new()
            .record(model.clone().into_record(), path.clone())
            .with_context(|| {
                format!("Failed to save checkpoint to '{}'", path.display())
            })?;

        self.write_json(MODEL_CONFIG_FILE, &WeatherClassifierConfig::new())?;
        self.write_json(TRAIN_CONFIG_FILE, cfg)?;
        self.write_json(SUMMARY_FILE, summary)?;

        tracing::info!("Saved checkpoint to '{}'", self.dir.display());
        Ok(())
    }

    /// Rebuild the classifier from its saved architecture and load
    /// the weights into it.
    pub fn load_model<B: Backend>(&self, device: &B::Device) -> Result<WeatherClassifier<B>> {
        let model_cfg: WeatherClassifierConfig = self.read_json(MODEL_CONFIG_FILE)?;
        let model = model_cfg.init::<B>(device);

        let path = self.dir.join(MODEL_FILE);
        let record = ModelRecorder::new()
            .load(path.clone(), device)
            .with_context(|| {
                format!("Cannot load checkpoint '{}'. Have you trained the model first?",
                    path.display())
            })?;

        Ok(model.load_record(record))
    }

    pub fn load_summary(&self) -> Result<TrainingSummary> {
        self.read_json(SUMMARY_FILE)
    }

    pub fn load_train_config(&self) -> Result<TrainConfig> {
        self.read_json(TRAIN_CONFIG_FILE)
    }

    fn write_json<T: Serialize>(&self, name: &str, value: &T) -> Result<()> {
        let path = self.dir.join(name);
        let json = serde_json::to_string_pretty(value)?;
        fs::write(&path, json)
            .with_context(|| format!("Cannot write '{}'", path.display()))?;
        tracing::debug!("Wrote '{}'", path.display());
        Ok(())
    }

    fn read_json<T: DeserializeOwned>(&self, name: &str) -> Result<T> {
        let path = self.dir.join(name);
        let json = fs::read_to_string(&path)
            .with_context(|| {
                format!(
                    "Cannot read '{}'. Make sure you have run 'train' first.",
                    path.display()
                )
            })?;
        serde_json::from_str(&json)
            .with_context(|| format!("Cannot parse '{}'", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::quality::DataQualityReport;
    use crate::domain::record::Features;
    use crate::ml::inferencer::Inferencer;
    use crate::ml::InferBackend;

    fn summary() -> TrainingSummary {
        TrainingSummary {
            trained_at:    chrono::Utc::now(),
            epochs:        50,
            train_rows:    8,
            val_rows:      2,
            data_quality:  DataQualityReport { total_rows: 10, usable_rows: 10, ..Default::default() },
            final_metrics: None,
        }
    }

    #[test]
    fn test_missing_checkpoint() {
        let dir  = tempfile::tempdir().unwrap();
        let ckpt = CheckpointManager::new(dir.path().join("nothing"));
        assert!(!ckpt.exists());
        assert!(ckpt.load_summary().is_err());
    }

    #[test]
    fn test_save_then_load_gives_same_predictions() {
        let dir    = tempfile::tempdir().unwrap();
        let ckpt   = CheckpointManager::new(dir.path().join("ckpt"));
        let device = <InferBackend as Backend>::Device::default();

        let model: WeatherClassifier<InferBackend> = WeatherClassifierConfig::new().init(&device);
        let original = Inferencer::new(model.clone());

        ckpt.save(&model, &TrainConfig::default(), &summary()).unwrap();
        assert!(ckpt.exists());

        let restored = Inferencer::from_checkpoint(&ckpt).unwrap();
        let features = Features::new(-1.0, 3.5, 8.2, 6.0);
        let a = original.probabilities(&features).unwrap();
        let b = restored.probabilities(&features).unwrap();
        for (x, y) in a.iter().zip(b.iter()) {
            assert!((x - y).abs() < 1e-5);
        }

        assert_eq!(ckpt.load_summary().unwrap().epochs, 50);
        assert_eq!(ckpt.load_train_config().unwrap().epochs, TrainConfig::default().epochs);
    }

    #[test]
    fn test_failed_overwrite_leaves_no_checkpoint() {
        let dir    = tempfile::tempdir().unwrap();
        let ckpt   = CheckpointManager::new(dir.path().join("ckpt"));
        let device = <InferBackend as Backend>::Device::default();
        let model: WeatherClassifier<InferBackend> = WeatherClassifierConfig::new().init(&device);

        ckpt.save(&model, &TrainConfig::default(), &summary()).unwrap();
        assert!(ckpt.exists());

        // A directory where the model config goes makes the retrain's save fail midway
        let config_path = dir.path().join("ckpt").join(MODEL_CONFIG_FILE);
        std::fs::remove_file(&config_path).unwrap();
        std::fs::create_dir(&config_path).unwrap();

        assert!(ckpt.save(&model, &TrainConfig::default(), &summary()).is_err());
        assert!(!ckpt.exists());
    }
}
