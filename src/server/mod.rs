// ============================================================
// Layer 7 — HTTP Service
// ============================================================
// axum router over a shared ModelRegistry. Handlers receive the
// registry through State; there is no global model.
//
// Training runs on the blocking pool so the runtime keeps
// answering /predict (with the previous model) while it works.

pub mod error;
pub mod handlers;

use anyhow::{Context, Result};
use axum::routing::{get, post};
use axum::Router;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::application::train_use_case::TrainConfig;
use crate::infra::checkpoint::CheckpointManager;
use crate::infra::registry::ModelRegistry;
use crate::ml::inferencer::Inferencer;

pub const DEFAULT_ADDR: &str = "0.0.0.0:5000";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServeConfig {
    pub addr:  String,
    /// Used for every POST /train
    pub train: TrainConfig,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            addr:  DEFAULT_ADDR.to_string(),
            train: TrainConfig::default(),
        }
    }
}

pub struct AppState {
    pub registry:     Arc<ModelRegistry>,
    pub train_config: TrainConfig,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(registry: Arc<ModelRegistry>, train_config: TrainConfig) -> Self {
        Self { registry, train_config }
    }
}

pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/train", post(handlers::handle_train))
        .route("/predict", post(handlers::handle_predict))
        .route("/api/skybox", get(handlers::handle_skybox))
        .route("/model", get(handlers::handle_model_status))
        .route("/health", get(handlers::handle_health))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve until the process is stopped.
pub async fn serve(config: ServeConfig) -> Result<()> {
    config.train.validate()?;

    let registry = Arc::new(ModelRegistry::new());
    restore_checkpoint(&registry, &config.train);

    let state    = Arc::new(AppState::new(registry, config.train));
    let app      = build_router(state);
    let listener = bind_listener(&config.addr).await?;

    tracing::info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, app)
        .await
        .context("HTTP server terminated unexpectedly")
}

pub async fn bind_listener(addr: &str) -> Result<tokio::net::TcpListener> {
    if let Ok(socket_addr) = addr.parse::<SocketAddr>() {
        tokio::net::TcpListener::bind(socket_addr)
            .await
            .with_context(|| format!("failed to bind listener on {socket_addr}"))
    } else {
        tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind listener on {addr}"))
    }
}

/// Serve the last checkpoint from startup, if one exists. A broken
/// checkpoint is logged and the service starts without a model.
fn restore_checkpoint(registry: &ModelRegistry, cfg: &TrainConfig) {
    let Some(dir) = &cfg.checkpoint_dir else {
        return;
    };
    let ckpt = CheckpointManager::new(dir);
    if !ckpt.exists() {
        tracing::info!("No checkpoint in '{}', waiting for POST /train", dir);
        return;
    }

    let restored = Inferencer::from_checkpoint(&ckpt)
        .and_then(|inferencer| Ok((inferencer, ckpt.load_summary()?)));
    match restored {
        Ok((inferencer, summary)) => {
            registry.install(inferencer, summary);
        }
        Err(err) => {
            tracing::warn!("Ignoring checkpoint in '{}': {:#}", dir, err);
            return;
        }
    }

    match ckpt.load_train_config() {
        Ok(trained_with) if trained_with.dataset_path != cfg.dataset_path => tracing::warn!(
            "Restored model was trained on '{}'; POST /train will use '{}'",
            trained_with.dataset_path,
            cfg.dataset_path,
        ),
        Ok(_) => {}
        Err(err) => tracing::debug!("No training config next to checkpoint: {:#}", err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::weather::WeatherCategory;
    use crate::infra::registry::Lifecycle;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use std::io::Write;
    use tower::ServiceExt;

    const CSV: &str = "\
date,precipitation,temp_max,temp_min,wind,weather
2012-01-01,0.0,12.8,5.0,4.7,drizzle
2012-01-02,10.9,10.6,2.8,4.5,rain
2012-01-03,0.8,11.7,7.2,2.3,rain
2012-01-04,20.3,12.2,5.6,4.7,rain
2012-01-05,1.3,8.9,2.8,6.1,rain
2012-01-06,2.5,4.4,2.2,2.2,rain
2012-01-07,0.0,7.2,2.8,2.3,rain
2012-01-08,0.0,10.0,2.8,2.0,sun
2012-01-09,4.3,9.4,5.0,3.4,rain
2012-01-10,1.0,6.1,0.6,3.4,rain
2012-01-11,0.0,6.1,-1.1,5.1,sun
2012-01-12,0.0,6.1,-1.7,1.9,sun
2012-01-13,0.0,5.0,-2.8,1.3,sun
2012-01-14,4.1,4.4,0.6,5.3,snow
2012-01-15,5.3,1.1,-3.3,3.2,snow
2012-01-16,2.5,1.7,-2.8,5.0,snow
2012-01-17,8.1,3.3,0.0,5.6,snow
2012-01-18,19.8,0.0,-2.8,5.0,snow
2012-01-19,15.2,-1.1,-2.8,1.6,snow
2012-01-20,13.5,7.2,-1.1,2.3,snow
2012-01-21,3.0,8.3,3.3,8.2,rain
2012-01-22,6.1,6.7,2.2,4.8,rain
2012-01-23,0.0,8.3,1.1,3.6,rain
2012-01-24,8.6,10.0,2.2,5.1,rain
2012-01-25,8.1,8.9,4.4,5.4,fog
";

    fn write_csv(dir: &tempfile::TempDir) -> String {
        let path = dir.path().join("weather.csv");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(CSV.as_bytes()).unwrap();
        path.to_string_lossy().into_owned()
    }

    fn test_state(dataset_path: String) -> SharedState {
        let cfg = TrainConfig {
            dataset_path,
            epochs:     3,
            batch_size: 8,
            seed:       Some(7),
            ..TrainConfig::default()
        };
        Arc::new(AppState::new(Arc::new(ModelRegistry::new()), cfg))
    }

    async fn send(app: &Router, method: &str, uri: &str, body: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        let status   = response.status();
        let bytes    = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    const FULL_BODY: &str = r#"{"temp_min": 2.8, "temp_max": 10.6, "precipitation": 10.9, "wind": 4.5}"#;

    #[tokio::test]
    async fn test_skybox_and_health() {
        let app = build_router(test_state("unused.csv".into()));

        let (status, body) = send(&app, "GET", "/api/skybox", "").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!({"skybox": "sunnySky"}));

        let (status, body) = send(&app, "GET", "/health", "").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_predict_before_training_is_unavailable() {
        let app = build_router(test_state("unused.csv".into()));
        let (status, body) = send(&app, "POST", "/predict", FULL_BODY).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"], "Model has not been trained yet");
    }

    #[tokio::test]
    async fn test_missing_fields_rejected_before_model_lookup() {
        let app = build_router(test_state("unused.csv".into()));
        let full: Value = serde_json::from_str(FULL_BODY).unwrap();

        let mut bodies = vec![String::new(), "null".to_string()];
        for field in ["temp_min", "temp_max", "precipitation", "wind"] {
            let mut dropped = full.clone();
            dropped.as_object_mut().unwrap().remove(field);
            bodies.push(dropped.to_string());

            let mut nulled = full.clone();
            nulled[field] = Value::Null;
            bodies.push(nulled.to_string());
        }

        for body in &bodies {
            let (status, json) = send(&app, "POST", "/predict", body).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
            assert_eq!(json, serde_json::json!({"error": "Missing required fields"}));
        }
    }

    #[tokio::test]
    async fn test_train_then_predict() {
        let dir = tempfile::tempdir().unwrap();
        let app = build_router(test_state(write_csv(&dir)));

        let (status, body) = send(&app, "POST", "/train", "").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Model trained successfully!");

        let (status, body) = send(&app, "POST", "/predict", FULL_BODY).await;
        assert_eq!(status, StatusCode::OK);
        let category: WeatherCategory = body["prediction"].as_str().unwrap().parse().unwrap();
        assert!(WeatherCategory::ALL.contains(&category));
        assert!(!body["skybox"].as_str().unwrap().is_empty());

        // Positional values are not named fields
        let (status, body) = send(&app, "POST", "/predict", "[2.8, 10.6, 10.9, 4.5]").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Missing required fields");

        let (status, body) = send(&app, "GET", "/model", "").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["state"], "ready");
        assert_eq!(body["version"], 1);
        assert_eq!(body["data_quality"]["total_rows"], 25);
    }

    #[tokio::test]
    async fn test_train_with_missing_dataset_fails() {
        let app = build_router(test_state("/no/such/weather.csv".into()));
        let (status, body) = send(&app, "POST", "/train", "").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].is_string());

        let (_, body) = send(&app, "GET", "/model", "").await;
        assert_eq!(body["state"], "absent");
    }

    #[tokio::test]
    async fn test_concurrent_train_conflicts() {
        let dir   = tempfile::tempdir().unwrap();
        let state = test_state(write_csv(&dir));
        let app   = build_router(state.clone());

        let _guard = state.registry.begin_training().unwrap();
        let (status, body) = send(&app, "POST", "/train", "").await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "Training already in progress");

        let (status, body) = send(&app, "POST", "/predict", FULL_BODY).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"], "Model is still training");
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let app = build_router(test_state("unused.csv".into()));
        let (status, body) = send(&app, "POST", "/predict", "{oops").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().starts_with("Malformed JSON body"));
    }

    #[test]
    fn test_checkpoint_restored_at_startup() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = TrainConfig {
            dataset_path:   write_csv(&dir),
            checkpoint_dir: Some(dir.path().join("ckpt").to_string_lossy().into_owned()),
            epochs:         2,
            ..TrainConfig::default()
        };
        crate::application::train_use_case::TrainUseCase::new(cfg.clone())
            .execute()
            .unwrap();

        let registry = ModelRegistry::new();
        restore_checkpoint(&registry, &cfg);
        assert_eq!(registry.status().state, Lifecycle::Ready);
    }
}
