// ============================================================
// Layer 7 — HTTP handlers
// ============================================================
//   POST /train       retrain from the configured CSV
//   POST /predict     classify one day of weather
//   GET  /api/skybox  the default skybox
//   GET  /model       registry lifecycle status
//   GET  /health      liveness

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::application::predict_use_case::PredictUseCase;
use crate::application::train_use_case::TrainUseCase;
use crate::domain::record::Features;
use crate::domain::scene::DEFAULT_SKYBOX;
use crate::domain::traits::WeatherPredictor;
use crate::domain::weather::WeatherCategory;
use crate::infra::registry::ModelStatus;
use crate::server::error::ApiError;
use crate::server::SharedState;

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SkyboxResponse {
    pub skybox: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PredictResponse {
    pub prediction: WeatherCategory,
    pub skybox:     String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Request body for /predict: one JSON object with four named
/// numeric fields. Absent and null fields stay None here.
#[derive(Debug, Default, PartialEq)]
pub struct PredictRequest {
    pub temp_min:      Option<f32>,
    pub temp_max:      Option<f32>,
    pub precipitation: Option<f32>,
    pub wind:          Option<f32>,
}

impl PredictRequest {
    /// Only an object can carry fields: an empty body, `null`, or any
    /// other JSON value parses as an empty request. Unparseable JSON
    /// and non-numeric field values are malformed.
    pub fn parse(body: &[u8]) -> Result<Self, ApiError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        let value: Value = serde_json::from_slice(body).map_err(ApiError::malformed)?;
        let Value::Object(fields) = value else {
            return Ok(Self::default());
        };

        Ok(Self {
            temp_min:      number_field(&fields, "temp_min")?,
            temp_max:      number_field(&fields, "temp_max")?,
            precipitation: number_field(&fields, "precipitation")?,
            wind:          number_field(&fields, "wind")?,
        })
    }

    pub fn features(&self) -> Option<Features> {
        Some(Features::new(
            self.temp_min?,
            self.temp_max?,
            self.precipitation?,
            self.wind?,
        ))
    }
}

fn number_field(fields: &Map<String, Value>, name: &str) -> Result<Option<f32>, ApiError> {
    match fields.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_f64()
            .map(|v| Some(v as f32))
            .ok_or_else(|| ApiError::malformed(format!("field '{name}' is not a finite number"))),
        Some(other) => Err(ApiError::malformed(format!(
            "field '{name}' must be a number, got {other}"
        ))),
    }
}

pub async fn handle_train(State(state): State<SharedState>) -> Result<Json<MessageResponse>, ApiError> {
    tracing::info!("Training requested on '{}'", state.train_config.dataset_path);

    let worker = state.clone();
    let version = tokio::task::spawn_blocking(move || -> Result<u64, ApiError> {
        let guard   = worker.registry.begin_training()?;
        // On error the guard is dropped and the previous model stays
        let trained = TrainUseCase::new(worker.train_config.clone()).execute()?;
        Ok(guard.publish(trained.inferencer, trained.summary).version())
    })
    .await
    .map_err(|err| ApiError::internal(format!("Training task failed: {err}")))??;

    tracing::info!("Training finished, serving model v{}", version);
    Ok(Json(MessageResponse {
        message: "Model trained successfully!".to_string(),
    }))
}

pub async fn handle_predict(
    State(state): State<SharedState>,
    body: Bytes,
) -> Result<Json<PredictResponse>, ApiError> {
    let request  = PredictRequest::parse(&body)?;
    let features = request.features().ok_or_else(ApiError::missing_fields)?;

    let result = PredictUseCase::new(state.registry.clone()).predict(&features)?;
    Ok(Json(PredictResponse {
        prediction: result.category,
        skybox:     result.scene_id,
    }))
}

pub async fn handle_skybox() -> Json<SkyboxResponse> {
    Json(SkyboxResponse {
        skybox: DEFAULT_SKYBOX.to_string(),
    })
}

pub async fn handle_model_status(State(state): State<SharedState>) -> Json<ModelStatus> {
    Json(state.registry.status())
}

pub async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
