//! Listener bridge: the transport-facing delivery callback.
//!
//! The external transport invokes [`ListenerBridge::on_message`] once per
//! received raw message, possibly from many worker tasks at once. Each call
//! converts the message and makes exactly one send attempt against the
//! destination channel; every failure along the way surfaces as
//! [`BridgeError::Delivery`] so the transport can apply its own
//! redelivery/dead-letter policy. No retries happen here.

use crate::channel::DestinationChannel;
use crate::convert::{BoxError, HeaderMappingConverter, MessageConverter};
use crate::message::RawInboundMessage;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Sentinel timeout meaning "no explicit timeout": the channel's default
/// send behavior is used. Any negative value has the same meaning.
pub const NO_TIMEOUT: i64 = -1;

#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// The bridge was assembled without a destination channel. Indicates a
    /// setup bug; surfaced at build time, never retried.
    #[error("bridge configuration invalid: {message}")]
    Configuration { message: String },

    /// Conversion or channel hand-off failed (including bounded-send
    /// expiry). Carries the underlying failure as its cause.
    #[error("failed to convert inbound message")]
    Delivery {
        #[source]
        source: BoxError,
    },
}

impl BridgeError {
    fn delivery(source: BoxError) -> Self {
        Self::Delivery { source }
    }
}

/// Receives raw transport messages, converts them, and forwards them to the
/// destination channel with an optional bounded wait.
pub struct ListenerBridge {
    channel: Arc<dyn DestinationChannel>,
    converter: Arc<dyn MessageConverter>,
    /// Milliseconds to wait for the channel to accept a message; negative
    /// means no explicit timeout. Read exactly once per `on_message` call.
    timeout_ms: AtomicI64,
}

impl std::fmt::Debug for ListenerBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerBridge")
            .field("timeout_ms", &self.timeout_ms)
            .finish_non_exhaustive()
    }
}

impl ListenerBridge {
    pub fn builder() -> ListenerBridgeBuilder {
        ListenerBridgeBuilder::default()
    }

    /// Update the send timeout. Negative restores the default (unbounded)
    /// send. Calls already in flight keep the value they read; there is no
    /// ordering guarantee against concurrent `on_message` calls beyond
    /// last-write-wins visibility.
    pub fn set_timeout_ms(&self, timeout_ms: i64) {
        self.timeout_ms.store(timeout_ms, Ordering::SeqCst);
    }

    /// Delivery callback: convert `raw` and hand the result to the
    /// destination channel. Exactly one send attempt is made; conversion
    /// failures short-circuit before any send. Blocking up to the configured
    /// timeout (or indefinitely when unset) is intentional backpressure
    /// toward the transport.
    pub async fn on_message(&self, raw: &RawInboundMessage) -> Result<(), BridgeError> {
        let timeout_ms = self.timeout_ms.load(Ordering::SeqCst);
        let message = self
            .converter
            .from_raw(raw)
            .map_err(BridgeError::delivery)?;
        let sent = if timeout_ms < 0 {
            self.channel.send(message).await
        } else {
            self.channel
                .send_timeout(message, Duration::from_millis(timeout_ms as u64))
                .await
        };
        sent.map_err(|e| {
            log::debug!("destination channel send failed: {e}");
            BridgeError::delivery(Box::new(e))
        })
    }
}

/// Builder for [`ListenerBridge`]. The destination channel is required; the
/// converter is optional. Unless the supplied converter already maps
/// transport headers, `build` wraps it (or the base payload conversion) in a
/// [`HeaderMappingConverter`] — exactly once, never double.
pub struct ListenerBridgeBuilder {
    channel: Option<Arc<dyn DestinationChannel>>,
    converter: Option<Arc<dyn MessageConverter>>,
    timeout_ms: i64,
}

impl Default for ListenerBridgeBuilder {
    fn default() -> Self {
        Self {
            channel: None,
            converter: None,
            timeout_ms: NO_TIMEOUT,
        }
    }
}

impl ListenerBridgeBuilder {
    pub fn channel(mut self, channel: Arc<dyn DestinationChannel>) -> Self {
        self.channel = Some(channel);
        self
    }

    pub fn converter(mut self, converter: Arc<dyn MessageConverter>) -> Self {
        self.converter = Some(converter);
        self
    }

    /// Initial send timeout in milliseconds (negative = unbounded).
    pub fn timeout_ms(mut self, timeout_ms: i64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn build(self) -> Result<ListenerBridge, BridgeError> {
        let channel = self.channel.ok_or_else(|| BridgeError::Configuration {
            message: "'channel' must not be absent".to_string(),
        })?;
        let converter: Arc<dyn MessageConverter> = match self.converter {
            Some(c) if c.maps_headers() => c,
            other => Arc::new(HeaderMappingConverter::new(other)),
        };
        Ok(ListenerBridge {
            channel,
            converter,
            timeout_ms: AtomicI64::new(self.timeout_ms),
        })
    }
}
