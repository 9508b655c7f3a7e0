pub mod models;
pub use models::*;

pub mod encoder;
mod mailbox;

mod hub;
pub use hub::*;

mod stream;
pub use stream::event_stream;
