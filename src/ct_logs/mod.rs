// Certificate Transparency Stream Module
//
// Connects to a certstream feed and exposes newly issued certificates as a pair of
// asynchronous streams (events and transport errors).

pub mod parser;
pub mod source;

pub use parser::{CertificateEvent, is_heartbeat};
pub use source::{
    CertstreamSource, EventSenders, EventStreams, Incoming, DEFAULT_CERTSTREAM_URL,
    DEFAULT_IDLE_TIMEOUT, DEFAULT_RECONNECT_DELAY, channel,
};

/// Result type for CT stream operations
pub type Result<T> = crate::error::Result<T>;
