// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust structs, enums and traits describing the weather
// domain. Nothing in here touches Burn, files or the network.
//
//   weather.rs    — WeatherCategory + label encoding (-1 sentinel)
//   record.rs     — WeatherRecord and the 4-feature input vector
//   scene.rs      — weather → skybox mapping
//   prediction.rs — PredictionResult returned to callers
//   traits.rs     — RecordSource / WeatherPredictor seams
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

pub mod weather;

pub mod record;

pub mod scene;

pub mod prediction;

pub mod traits;
