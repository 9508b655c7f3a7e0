use crate::error::HubError;
use crate::sse::encoder;
use crate::sse::hub::Hub;
use crate::sse::models::SubscriberHandle;
use axum::{
    body::Body,
    extract::Extension,
    http::{Version, header},
    response::{IntoResponse, Response},
};
use std::convert::Infallible;

/// `GET` handler streaming every hub broadcast to one client.
pub async fn event_stream(
    Extension(hub): Extension<Hub>,
    version: Version,
) -> Result<Response, HubError> {
    if !supports_incremental_flush(version) {
        return Err(HubError::UnsupportedTransport);
    }

    let mut subscription = hub.subscribe()?;
    let handle = subscription.handle();

    let stream = async_stream::stream! {
        let mut connection = Connection { handle, closed_by_hub: false };

        while let Some(message) = subscription.recv().await {
            yield Ok::<_, Infallible>(encoder::encode(&message));
        }

        connection.closed_by_hub = true;
    };

    // Frames are written by hand rather than through `Sse`: `Event` rewrites
    // payload bytes, and the wire format must carry them unmodified.
    Ok((
        [
            (header::CONTENT_TYPE, encoder::CONTENT_TYPE),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        Body::from_stream(stream),
    )
        .into_response())
}

/// HTTP/0.9 responses carry no headers, so there is no way to announce the
/// event-stream content type. HTTP/1.0 is streamed with a close-delimited body.
fn supports_incremental_flush(version: Version) -> bool {
    version != Version::HTTP_09
}

/// Lives as long as the response body. The body is dropped early when the
/// client goes away, which is where the write failure shows up.
struct Connection {
    handle: SubscriberHandle,
    closed_by_hub: bool,
}

impl Drop for Connection {
    fn drop(&mut self) {
        if self.closed_by_hub {
            debug!(handle = %self.handle, "stream closed by hub");
        } else {
            info!(handle = %self.handle, "connection lost");
        }
    }
}
