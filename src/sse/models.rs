use axum::body::Bytes;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Event name used by [`crate::sse::Hub::send`].
pub const DEFAULT_EVENT: &str = "message";

/// One broadcast event. Cloned into every mailbox; never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    event: Arc<str>,
    payload: Bytes,
}

impl Message {
    pub fn new(event: impl Into<Arc<str>>, payload: impl Into<Bytes>) -> Self {
        Self {
            event: event.into(),
            payload: payload.into(),
        }
    }

    pub fn event(&self) -> &str {
        &self.event
    }

    pub fn payload(&self) -> &Bytes {
        &self.payload
    }
}

/// Opaque identity of one registered mailbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriberHandle(u64);

impl SubscriberHandle {
    pub(crate) fn from_raw(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for SubscriberHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HubStats {
    pub subscribers: usize,
    /// Copies accepted by a mailbox.
    pub delivered: u64,
    /// Copies discarded because the target mailbox was full.
    pub dropped: u64,
}
