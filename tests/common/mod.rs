#![allow(dead_code)]

use axum::{
    Router,
    body::{Body, BodyDataStream, Bytes},
    http::{Method, Request, Response, Version},
};
use futures::StreamExt;
use sse_hub::startup::build_router;
use sse_hub::{Hub, HubConfig};
use std::time::Duration;
use tokio::time::timeout;
use tower::ServiceExt;

pub fn test_hub(mailbox_capacity: usize) -> (Hub, Router) {
    let hub = Hub::new(HubConfig { mailbox_capacity });
    let app = build_router(hub.clone());
    (hub, app)
}

pub async fn open_stream(app: &Router) -> Response<Body> {
    open_stream_with_version(app, Version::HTTP_11).await
}

pub async fn open_stream_with_version(app: &Router, version: Version) -> Response<Body> {
    app.clone()
        .oneshot(
            Request::builder()
                .uri("/events")
                .method(Method::GET)
                .version(version)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
}

/// Next body chunk, `None` once the stream has ended.
pub async fn next_chunk(body: &mut BodyDataStream) -> Option<Bytes> {
    timeout(Duration::from_secs(2), body.next())
        .await
        .expect("timed out waiting for body chunk")
        .map(|chunk| chunk.unwrap())
}

/// A parsed `event:`/`data:` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub event: String,
    pub data: String,
}

/// Reads until `count` complete frames have arrived.
pub async fn read_frames(body: &mut BodyDataStream, count: usize) -> Vec<Frame> {
    let mut buffer = String::new();
    let mut frames = Vec::new();

    while frames.len() < count {
        let chunk = next_chunk(body).await.expect("stream ended early");
        buffer.push_str(std::str::from_utf8(&chunk).unwrap());

        while let Some(end) = buffer.find("\n\n") {
            let raw: String = buffer.drain(..end + 2).collect();
            let mut frame = Frame {
                event: String::new(),
                data: String::new(),
            };
            for line in raw.lines() {
                if let Some(event) = line.strip_prefix("event: ") {
                    frame.event = event.to_string();
                } else if let Some(data) = line.strip_prefix("data: ") {
                    frame.data = data.to_string();
                }
            }
            frames.push(frame);
        }
    }

    frames
}
