use crate::control::{disconnect_all, publish, stats};
use crate::error::ConfigError;
use crate::sse::{DEFAULT_MAILBOX_CAPACITY, Hub, event_stream};
use axum::{
    Router,
    extract::Extension,
    http::{
        Method, StatusCode,
        header::{ACCEPT, CONTENT_TYPE},
    },
    response::IntoResponse,
    routing::{get, post},
};
use std::net::SocketAddr;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub mailbox_capacity: usize,
}

impl Config {
    /// Reads `SSE_BIND_ADDR` and `SSE_MAILBOX_CAPACITY`, loading `.env` first if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind_addr = lookup("SSE_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_addr
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidValue {
                key: "SSE_BIND_ADDR",
                value: bind_addr.clone(),
            })?;

        let mailbox_capacity = match lookup("SSE_MAILBOX_CAPACITY") {
            Some(value) => value
                .trim()
                .parse::<usize>()
                .map_err(|_| ConfigError::InvalidValue {
                    key: "SSE_MAILBOX_CAPACITY",
                    value: value.clone(),
                })?,
            None => DEFAULT_MAILBOX_CAPACITY,
        };

        Ok(Config {
            bind_addr,
            mailbox_capacity,
        })
    }
}

pub fn build_router(hub: Hub) -> Router {
    Router::new()
        .route("/events", get(event_stream))
        .route("/publish", post(publish))
        .route("/disconnect", post(disconnect_all))
        .route("/stats", get(stats))
        .layer(Extension(hub))
        .layer(
            CorsLayer::new()
                .allow_origin(AllowOrigin::mirror_request())
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([CONTENT_TYPE, ACCEPT]),
        )
        .layer(TraceLayer::new_for_http())
        .fallback(handler_404)
}

async fn handler_404() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "nothing to see here")
}
