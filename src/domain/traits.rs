// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The application layer talks to the outside world through
// these two seams:
//
//   RecordSource     — anything that yields weather records
//                      (CsvWeatherLoader, in-memory fixtures)
//   WeatherPredictor — anything that turns features into a
//                      prediction (PredictUseCase over the
//                      model registry, or a loaded checkpoint)
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use anyhow::Result;

use crate::domain::prediction::PredictionResult;
use crate::domain::record::{Features, WeatherRecord};

// ─── RecordSource ─────────────────────────────────────────────────────────────
/// Any component that can load the weather dataset.
pub trait RecordSource {
    /// Load every data row in source order.
    /// Bad rows are returned too — screening happens later.
    fn load_all(&self) -> Result<Vec<WeatherRecord>>;
}

// ─── WeatherPredictor ─────────────────────────────────────────────────────────
/// Any component that can classify one day of weather.
pub trait WeatherPredictor {
    fn predict(&self, features: &Features) -> Result<PredictionResult>;
}

/// Fixed in-memory record source, handy for tests and demos.
impl RecordSource for Vec<WeatherRecord> {
    fn load_all(&self) -> Result<Vec<WeatherRecord>> {
        Ok(self.clone())
    }
}
