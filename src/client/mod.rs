// ============================================================
// Layer 8 — Service client
// ============================================================
// Thin reqwest wrapper over the HTTP API, plus the scene-cue logic
// a front end applies to the replies. One request per call, no
// retries: failures come back as errors for the caller to show.

pub mod cues;

use anyhow::{bail, Context, Result};
use reqwest::{Response, StatusCode};
use serde::{Deserialize, Serialize};

use crate::domain::record::Features;

pub const DEFAULT_URL: &str = "http://localhost:5000";

#[derive(Debug, Serialize)]
struct PredictPayload {
    temp_min:      f32,
    temp_max:      f32,
    precipitation: f32,
    wind:          f32,
}

impl From<&Features> for PredictPayload {
    fn from(f: &Features) -> Self {
        Self {
            temp_min:      f.temp_min,
            temp_max:      f.temp_max,
            precipitation: f.precipitation,
            wind:          f.wind,
        }
    }
}

/// Missing fields in a reply read as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PredictReply {
    pub prediction: String,
    pub skybox:     String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct MessageReply {
    message: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SkyboxReply {
    skybox: String,
}

#[derive(Debug, Deserialize)]
struct ErrorReply {
    error: String,
}

#[derive(Debug, Clone)]
pub struct ServiceClient {
    base_url: String,
    http:     reqwest::Client,
}

impl ServiceClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_http_client(base_url, reqwest::Client::new())
    }

    pub fn with_http_client(base_url: impl Into<String>, http: reqwest::Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, http }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POST /train and return the server's message.
    pub async fn train(&self) -> Result<String> {
        let response = self
            .http
            .post(self.url("/train"))
            .send()
            .await
            .with_context(|| format!("POST {} failed", self.url("/train")))?;
        let reply: MessageReply = read_json(response).await?;
        Ok(reply.message)
    }

    pub async fn predict(&self, features: &Features) -> Result<PredictReply> {
        let response = self
            .http
            .post(self.url("/predict"))
            .json(&PredictPayload::from(features))
            .send()
            .await
            .with_context(|| format!("POST {} failed", self.url("/predict")))?;
        read_json(response).await
    }

    pub async fn skybox(&self) -> Result<String> {
        let response = self
            .http
            .get(self.url("/api/skybox"))
            .send()
            .await
            .with_context(|| format!("GET {} failed", self.url("/api/skybox")))?;
        let reply: SkyboxReply = read_json(response).await?;
        Ok(reply.skybox)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

async fn read_json<T: for<'de> Deserialize<'de>>(response: Response) -> Result<T> {
    let status = response.status();
    let url    = response.url().clone();
    let body   = response.text().await.context("failed to read response body")?;

    if !status.is_success() {
        let message = error_message(status, &body);
        tracing::warn!("{} returned {}: {}", url, status, message);
        bail!("{}: {}", status, message);
    }
    serde_json::from_str(&body).with_context(|| format!("invalid JSON from {url}"))
}

/// The server's `{"error": ...}` text, or the raw body.
fn error_message(status: StatusCode, body: &str) -> String {
    match serde_json::from_str::<ErrorReply>(body) {
        Ok(reply) => reply.error,
        Err(_) if body.trim().is_empty() => status.canonical_reason().unwrap_or("error").to_string(),
        Err(_) => body.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::train_use_case::TrainConfig;
    use crate::infra::registry::ModelRegistry;
    use crate::server::{bind_listener, build_router, AppState};
    use std::sync::Arc;

    async fn spawn_server() -> String {
        let state = Arc::new(AppState::new(
            Arc::new(ModelRegistry::new()),
            TrainConfig { dataset_path: "/no/such/weather.csv".into(), ..TrainConfig::default() },
        ));
        let listener = bind_listener("127.0.0.1:0").await.unwrap();
        let addr     = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, build_router(state)).await.unwrap();
        });
        format!("http://{addr}/")
    }

    fn client(url: String) -> ServiceClient {
        let http = reqwest::Client::builder().no_proxy().build().unwrap();
        ServiceClient::with_http_client(url, http)
    }

    #[test]
    fn test_base_url_trailing_slash_is_dropped() {
        let c = ServiceClient::new("http://localhost:5000/");
        assert_eq!(c.base_url(), "http://localhost:5000");
        assert_eq!(c.url("/predict"), "http://localhost:5000/predict");
    }

    #[test]
    fn test_error_message_prefers_json_error() {
        let msg = error_message(StatusCode::BAD_REQUEST, r#"{"error": "Missing required fields"}"#);
        assert_eq!(msg, "Missing required fields");
        assert_eq!(error_message(StatusCode::NOT_FOUND, ""), "Not Found");
        assert_eq!(error_message(StatusCode::BAD_GATEWAY, "upstream down\n"), "upstream down");
    }

    #[test]
    fn test_reply_with_missing_fields_reads_empty() {
        let reply: PredictReply = serde_json::from_str(r#"{"prediction": "sun"}"#).unwrap();
        assert_eq!(reply.prediction, "sun");
        assert_eq!(reply.skybox, "");
    }

    #[tokio::test]
    async fn test_client_against_live_server() {
        let client = client(spawn_server().await);

        assert_eq!(client.skybox().await.unwrap(), "sunnySky");

        let err = client.predict(&Features::new(1.0, 5.0, 0.0, 2.0)).await.unwrap_err();
        assert!(err.to_string().contains("Model has not been trained yet"));

        let err = client.train().await.unwrap_err();
        assert!(err.to_string().starts_with("500"));
    }
}
