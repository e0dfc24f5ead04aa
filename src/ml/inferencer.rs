// ============================================================
// Layer 5 — Inferencer
// ============================================================
// Runs the trained classifier on one feature vector:
//
//   [temp_min, temp_max, precipitation, wind]
//       │  Tensor [1, 4]
//       ▼
//   forward → softmax → [1, 5] probabilities
//       │
//       ▼
//   argmax → WeatherCategory → PredictionResult (with skybox)

use anyhow::{anyhow, Result};
use burn::prelude::*;

use crate::domain::prediction::PredictionResult;
use crate::domain::record::{Features, NUM_FEATURES};
use crate::domain::weather::{WeatherCategory, NUM_CLASSES};
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::model::WeatherClassifier;
use crate::ml::InferBackend;

pub struct Inferencer {
    model:  WeatherClassifier<InferBackend>,
    device: <InferBackend as Backend>::Device,
}

impl Inferencer {
    pub fn new(model: WeatherClassifier<InferBackend>) -> Self {
        let device = <InferBackend as Backend>::Device::default();
        Self { model, device }
    }

    pub fn from_checkpoint(ckpt_manager: &CheckpointManager) -> Result<Self> {
        let device = <InferBackend as Backend>::Device::default();
        let model  = ckpt_manager.load_model::<InferBackend>(&device)?;
        tracing::info!("Model loaded from checkpoint");
        Ok(Self { model, device })
    }

    /// Softmax distribution over the five classes, in class-index order.
    pub fn probabilities(&self, features: &Features) -> Result<[f32; NUM_CLASSES]> {
        let input = Tensor::<InferBackend, 2>::from_data(
            TensorData::new(features.to_array().to_vec(), [1, NUM_FEATURES]),
            &self.device,
        );

        let probs: Vec<f32> = self
            .model
            .probabilities(input)
            .into_data()
            .to_vec::<f32>()
            .map_err(|e| anyhow!("Cannot read model output: {e:?}"))?;

        probs
            .try_into()
            .map_err(|v: Vec<f32>| anyhow!("Expected {NUM_CLASSES} class scores, got {}", v.len()))
    }

    pub fn predict(&self, features: &Features) -> Result<PredictionResult> {
        let probs = self.probabilities(features)?;
        let index = argmax(&probs);
        let category = WeatherCategory::from_class_index(index)
            .ok_or_else(|| anyhow!("Class index {index} out of range"))?;

        tracing::debug!(
            "Predicted {} (p={:.3}) for {:?}",
            category, probs[index], features
        );
        Ok(PredictionResult::new(category, probs))
    }
}

/// Index of the largest score; ties and NaNs resolve to the lowest index.
fn argmax(scores: &[f32]) -> usize {
    let mut best = 0;
    for (i, &s) in scores.iter().enumerate().skip(1) {
        if s > scores[best] {
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::model::WeatherClassifierConfig;

    fn untrained() -> Inferencer {
        let device = <InferBackend as Backend>::Device::default();
        Inferencer::new(WeatherClassifierConfig::new().init(&device))
    }

    #[test]
    fn test_argmax_prefers_first_on_ties() {
        assert_eq!(argmax(&[0.2, 0.4, 0.4, 0.0, 0.0]), 1);
        assert_eq!(argmax(&[0.1, 0.1, 0.1, 0.1, 0.6]), 4);
        assert_eq!(argmax(&[f32::NAN, 0.3, 0.1, 0.1, 0.1]), 0);
    }

    #[test]
    fn test_prediction_is_a_valid_category() {
        let inferencer = untrained();
        let result = inferencer
            .predict(&Features::new(2.8, 10.6, 10.9, 4.5))
            .unwrap();

        assert!(WeatherCategory::ALL.contains(&result.category));
        assert!(!result.scene_id.is_empty());
        let total: f32 = result.probabilities.iter().sum();
        assert!((total - 1.0).abs() < 1e-4);
    }
}
