// ============================================================
// Layer 3 — Prediction Result
// ============================================================
// What the service hands back for one feature vector: the
// winning category and the skybox it maps to. The confidence
// and full distribution are kept for logs and the CLI.

use serde::{Deserialize, Serialize};

use crate::domain::scene::skybox_for;
use crate::domain::weather::{WeatherCategory, NUM_CLASSES};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub category:      WeatherCategory,
    pub scene_id:      String,
    /// Softmax probability of the winning class
    pub confidence:    f32,
    /// Softmax distribution in class-index order
    pub probabilities: [f32; NUM_CLASSES],
}

impl PredictionResult {
    /// Build a result from a class distribution. The scene id is
    /// always derived from the category, never supplied separately.
    pub fn new(category: WeatherCategory, probabilities: [f32; NUM_CLASSES]) -> Self {
        Self {
            category,
            scene_id:   skybox_for(category).to_string(),
            confidence: probabilities[category.class_index()],
            probabilities,
        }
    }
}
