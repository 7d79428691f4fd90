//! Synchronization channel between the control surface and the
//! remote demo engine.
//!
//! The engine speaks a small JSON protocol over one persistent
//! websocket; this crate encodes outbound intents, decodes inbound
//! snapshots and frame times, and drives the connection lifecycle
//! (bounded first-connect retry, fixed-interval frame-time polling)
//! on a worker thread bridged to the caller with `std::sync::mpsc`.

pub mod channel;
pub mod error;
pub mod protocol;
pub mod retry;

pub use channel::{
    LinkCommand, LinkCommandSender, LinkConfig, LinkEvent, LinkEventReceiver, spawn_link,
};
pub use error::{LinkError, Result};
pub use protocol::{
    Inbound, REQ_DEMO_INFO, REQ_SYSTEM_FPS, TimeInfo, decode_inbound, encode_demo, encode_time,
};
pub use retry::{RETRY_BUDGET, RETRY_DELAY, RetryPolicy};
