//! Message representations on either side of the bridge.

use std::collections::HashMap;

/// Message as delivered by the external transport, before conversion.
///
/// Owned by the transport; the bridge borrows it read-only for the duration
/// of the conversion call.
#[derive(Debug, Clone, Default)]
pub struct RawInboundMessage {
    pub payload: Vec<u8>,
    /// Transport-level metadata (e.g. broker properties).
    pub headers: HashMap<String, String>,
}

impl RawInboundMessage {
    pub fn new(payload: impl Into<Vec<u8>>) -> Self {
        Self {
            payload: payload.into(),
            headers: HashMap::new(),
        }
    }
}

/// Normalized message handed to the destination channel: immutable payload
/// plus a string-keyed header map. Ownership moves to the channel on send.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InternalMessage {
    pub payload: Vec<u8>,
    pub headers: HashMap<String, String>,
}

impl InternalMessage {
    pub fn new(payload: impl Into<Vec<u8>>) -> Self {
        Self {
            payload: payload.into(),
            headers: HashMap::new(),
        }
    }
}
