// ============================================================
// Layer 7 — HTTP errors
// ============================================================
// Every failure leaves the service as `{"error": "<message>"}`
// with a status code chosen here, never as a bare 500 page.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::infra::registry::RegistryError;

pub const MISSING_FIELDS: &str = "Missing required fields";

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug)]
pub struct ApiError {
    status:  StatusCode,
    message: String,
}

impl ApiError {
    pub fn new<S: Into<String>>(status: StatusCode, message: S) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn missing_fields() -> Self {
        Self::new(StatusCode::BAD_REQUEST, MISSING_FIELDS)
    }

    pub fn malformed(reason: impl std::fmt::Display) -> Self {
        Self::new(StatusCode::BAD_REQUEST, format!("Malformed JSON body: {reason}"))
    }

    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<RegistryError> for ApiError {
    fn from(err: RegistryError) -> Self {
        let status = match err {
            RegistryError::NotTrained | RegistryError::StillTraining => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            RegistryError::AlreadyTraining => StatusCode::CONFLICT,
        };
        Self::new(status, err.to_string())
    }
}

/// Registry errors keep their own status; anything else is a 500.
impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast_ref::<RegistryError>() {
            Some(registry_err) => registry_err.clone().into(),
            None => Self::internal(format!("{err:#}")),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!("{} {}", self.status, self.message);
        } else {
            tracing::debug!("{} {}", self.status, self.message);
        }
        let payload = Json(ErrorResponse {
            error: self.message,
        });
        (self.status, payload).into_response()
    }
}
