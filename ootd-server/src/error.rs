use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::{Value, json};

use ootd_core::Error as CoreError;

/// JSON error envelope: `{"error": ...}`, plus `details` on server-side
/// failures and `received` when a coordinate probe echoes bad input back.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: Value,
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self { status: StatusCode::BAD_REQUEST, body: json!({ "error": message.into() }) }
    }

    pub fn internal(message: &str, details: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: json!({ "error": message, "details": details.into() }),
        }
    }

    /// Echo the raw coordinate values the caller sent.
    pub fn with_received(mut self, lat: Option<&str>, lon: Option<&str>) -> Self {
        self.body["received"] = json!({ "lat": lat, "lon": lon });
        self
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidCoordinate(message) | CoreError::InvalidInput(message) => {
                Self::bad_request(message)
            }
            CoreError::WeatherUnavailable(details) => {
                Self::internal("failed to fetch weather data", details)
            }
            CoreError::CatalogUnavailable(details) => {
                Self::internal("failed to load the clothing catalog", details)
            }
            CoreError::StoreUnavailable(details) => Self::internal("store request failed", details),
            CoreError::ModelUnavailable(details) => {
                Self::internal("language model request failed", details)
            }
            CoreError::ModelResponseMalformed(details) => {
                Self::internal("failed to parse the model response", details)
            }
            CoreError::ModelResponseIncomplete(details) => {
                Self::internal("the model response was missing required data", details)
            }
            CoreError::ModelResponseInvalid(details) => {
                Self::internal("the model response failed validation", details)
            }
            CoreError::Internal(details) => Self::internal("internal server error", details),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = %self.status, body = %self.body, "request failed");
        }
        (self.status, Json(self.body)).into_response()
    }
}
