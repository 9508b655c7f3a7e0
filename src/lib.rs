#[macro_use]
extern crate tracing;

pub mod control;
pub mod error;
pub mod sse;
pub mod startup;

pub use error::{ConfigError, HubError};
pub use sse::{Hub, HubConfig, Message, SubscriberHandle, Subscription};
