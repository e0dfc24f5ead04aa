// ============================================================
// Layer 2 — PredictUseCase
// ============================================================
// Classifies one day of weather with whatever model the registry
// is serving right now:
//
//   Step 1: Take the current snapshot      (Layer 6 - infra)
//   Step 2: Run the inferencer on it       (Layer 5 - ml)
//   Step 3: Map category → skybox          (Layer 3 - domain)
//
// The snapshot Arc is cloned out of the registry first, so a
// training run finishing mid-request cannot change the model
// this request uses.

use anyhow::Result;
use std::sync::Arc;

use crate::domain::prediction::PredictionResult;
use crate::domain::record::Features;
use crate::domain::traits::WeatherPredictor;
use crate::infra::registry::ModelRegistry;
use crate::ml::inferencer::Inferencer;

pub struct PredictUseCase {
    registry: Arc<ModelRegistry>,
}

impl PredictUseCase {
    pub fn new(registry: Arc<ModelRegistry>) -> Self {
        Self { registry }
    }
}

impl WeatherPredictor for PredictUseCase {
    /// Fails with a `RegistryError` when no model is ready.
    fn predict(&self, features: &Features) -> Result<PredictionResult> {
        let snapshot = self.registry.current()?;
        let result   = snapshot.with_inferencer(|inf| inf.predict(features))?;

        tracing::info!(
            "Prediction v{}: {} → {} (p={:.3})",
            snapshot.version(),
            result.category,
            result.scene_id,
            result.confidence,
        );
        Ok(result)
    }
}

/// A loaded model can predict on its own, e.g. from a checkpoint.
impl WeatherPredictor for Inferencer {
    fn predict(&self, features: &Features) -> Result<PredictionResult> {
        Inferencer::predict(self, features)
    }
}
