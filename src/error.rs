use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HubError {
    #[error("hub is closed")]
    Closed,
    #[error("server-side events not supported")]
    UnsupportedTransport,
    #[error("event name must be non-empty and fit on one line")]
    InvalidEvent,
    #[error("payload must fit on one line")]
    InvalidPayload,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}")]
    InvalidValue { key: &'static str, value: String },
}

impl IntoResponse for HubError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            // Plain-text body, no JSON envelope.
            HubError::UnsupportedTransport => {
                return (StatusCode::NOT_IMPLEMENTED, self.to_string()).into_response();
            }
            HubError::Closed => (StatusCode::SERVICE_UNAVAILABLE, "Hub closed"),
            HubError::InvalidEvent => (StatusCode::BAD_REQUEST, "Invalid event name"),
            HubError::InvalidPayload => (StatusCode::BAD_REQUEST, "Invalid payload"),
        };

        let body = Json(json!({
            "error": error_message,
            "details": self.to_string()
        }));

        (status, body).into_response()
    }
}
