//! Conversion seam: raw transport message -> internal message.
//!
//! The bridge always talks to a header-mapping-capable converter: at
//! construction time a plain converter (or no converter) is wrapped in
//! [`HeaderMappingConverter`], which adds transport-header propagation on
//! top of the base conversion. A converter that already maps headers
//! reports so via [`MessageConverter::maps_headers`] and is used as-is.

use crate::message::{InternalMessage, RawInboundMessage};
use std::sync::Arc;

/// Arbitrary failure raised by a collaborator (converter or channel).
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Converts a raw transport message into the internal representation.
pub trait MessageConverter: Send + Sync {
    /// Convert one raw message. May fail on malformed payloads, unsupported
    /// header types, or converter-internal errors.
    fn from_raw(&self, raw: &RawInboundMessage) -> Result<InternalMessage, BoxError>;

    /// Whether this converter already propagates transport headers into the
    /// internal message. Converters that do are used unwrapped by the bridge.
    fn maps_headers(&self) -> bool {
        false
    }
}

/// Base conversion when no converter is supplied: payload copied verbatim,
/// header propagation left to the decorator.
#[derive(Debug, Default)]
pub struct PayloadConverter;

impl MessageConverter for PayloadConverter {
    fn from_raw(&self, raw: &RawInboundMessage) -> Result<InternalMessage, BoxError> {
        Ok(InternalMessage::new(raw.payload.clone()))
    }
}

/// Decorator that augments an inner conversion with transport-header
/// propagation. Headers set by the inner converter win over transport
/// headers of the same name (the converter is the more specific source).
pub struct HeaderMappingConverter {
    inner: Arc<dyn MessageConverter>,
}

impl HeaderMappingConverter {
    /// Wrap `inner`, or the base [`PayloadConverter`] when absent.
    pub fn new(inner: Option<Arc<dyn MessageConverter>>) -> Self {
        Self {
            inner: inner.unwrap_or_else(|| Arc::new(PayloadConverter)),
        }
    }
}

impl MessageConverter for HeaderMappingConverter {
    fn from_raw(&self, raw: &RawInboundMessage) -> Result<InternalMessage, BoxError> {
        let mut message = self.inner.from_raw(raw)?;
        for (name, value) in &raw.headers {
            message
                .headers
                .entry(name.clone())
                .or_insert_with(|| value.clone());
        }
        Ok(message)
    }

    fn maps_headers(&self) -> bool {
        true
    }
}
