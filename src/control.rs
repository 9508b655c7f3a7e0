use crate::error::HubError;
use crate::sse::{DEFAULT_EVENT, Hub, encoder};
use axum::{
    extract::{Extension, Json},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct PublishRequest {
    pub event: Option<String>,
    pub data: String,
}

#[derive(Debug, Serialize)]
pub struct PublishResponse {
    pub event: String,
    pub queued: bool,
}

/// Queue a broadcast to every connected stream
pub async fn publish(
    Extension(hub): Extension<Hub>,
    Json(payload): Json<PublishRequest>,
) -> Result<impl IntoResponse, HubError> {
    let event = payload.event.unwrap_or_else(|| DEFAULT_EVENT.to_string());

    // The wire format has no escaping, so reject anything that would split a frame
    if event.is_empty() || !encoder::is_single_line(event.as_bytes()) {
        return Err(HubError::InvalidEvent);
    }
    if !encoder::is_single_line(payload.data.as_bytes()) {
        return Err(HubError::InvalidPayload);
    }

    hub.send_event(&event, payload.data)?;

    Ok((
        StatusCode::ACCEPTED,
        Json(PublishResponse {
            event,
            queued: true,
        }),
    ))
}

/// Close every open stream
pub async fn disconnect_all(Extension(hub): Extension<Hub>) -> Result<StatusCode, HubError> {
    hub.disconnect_all()?;
    Ok(StatusCode::ACCEPTED)
}

pub async fn stats(Extension(hub): Extension<Hub>) -> Result<impl IntoResponse, HubError> {
    let stats = hub.stats().await?;
    Ok((StatusCode::OK, Json(stats)))
}
