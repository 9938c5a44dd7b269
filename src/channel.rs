//! Destination channel: the internal endpoint converted messages are handed to.
//!
//! The bridge holds the channel as a shared `Arc<dyn DestinationChannel>`;
//! buffering, fan-out, and consumer dispatch are the channel's own concern.
//! [`MpscChannel`] is the stock implementation over `tokio::sync::mpsc`.

use crate::convert::BoxError;
use crate::message::InternalMessage;
use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::SendTimeoutError;

/// Failure to hand a message to the destination channel.
#[derive(Debug, thiserror::Error)]
pub enum SendError {
    /// The channel's receiving side is gone; the message cannot be accepted.
    #[error("destination channel closed")]
    Closed,

    /// A bounded send expired before the channel accepted the message.
    #[error("send timed out after {0:?}")]
    Timeout(Duration),

    /// Wrapped failure from a channel implementation.
    #[error("destination channel send failed")]
    Other(#[source] BoxError),
}

/// Internal publish/subscribe endpoint accepting converted messages.
#[async_trait]
pub trait DestinationChannel: Send + Sync {
    /// Send with the channel's default blocking policy (may wait
    /// indefinitely for capacity).
    async fn send(&self, message: InternalMessage) -> Result<(), SendError>;

    /// Send, waiting at most `timeout` for the channel to accept the
    /// message. Expiry is reported as [`SendError::Timeout`].
    async fn send_timeout(
        &self,
        message: InternalMessage,
        timeout: Duration,
    ) -> Result<(), SendError>;
}

/// Destination channel over a bounded tokio mpsc queue. A full buffer makes
/// senders wait, so transport-side callers stall when consumers fall behind.
pub struct MpscChannel {
    tx: mpsc::Sender<InternalMessage>,
}

impl MpscChannel {
    /// Create a channel with the given buffer capacity, returning the
    /// destination plus the consumer side.
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<InternalMessage>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }

    /// Wrap an existing sender (e.g. one shared with other producers).
    pub fn from_sender(tx: mpsc::Sender<InternalMessage>) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl DestinationChannel for MpscChannel {
    async fn send(&self, message: InternalMessage) -> Result<(), SendError> {
        self.tx.send(message).await.map_err(|_| SendError::Closed)
    }

    async fn send_timeout(
        &self,
        message: InternalMessage,
        timeout: Duration,
    ) -> Result<(), SendError> {
        self.tx
            .send_timeout(message, timeout)
            .await
            .map_err(|e| match e {
                SendTimeoutError::Timeout(_) => SendError::Timeout(timeout),
                SendTimeoutError::Closed(_) => SendError::Closed,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn send_delivers_to_receiver() {
        let (channel, mut rx) = MpscChannel::new(4);
        channel
            .send(InternalMessage::new("hello"))
            .await
            .expect("send");
        let got = rx.recv().await.expect("recv");
        assert_eq!(got.payload, b"hello");
    }

    #[tokio::test]
    async fn send_timeout_expires_when_buffer_full() {
        let (channel, _rx) = MpscChannel::new(1);
        channel.send(InternalMessage::new("a")).await.expect("fill");
        let err = channel
            .send_timeout(InternalMessage::new("b"), Duration::from_millis(20))
            .await
            .expect_err("should time out");
        assert!(matches!(err, SendError::Timeout(_)));
    }

    #[tokio::test]
    async fn send_reports_closed_when_receiver_dropped() {
        let (channel, rx) = MpscChannel::new(1);
        drop(rx);
        let err = channel
            .send(InternalMessage::new("a"))
            .await
            .expect_err("should be closed");
        assert!(matches!(err, SendError::Closed));
        let err = channel
            .send_timeout(InternalMessage::new("b"), Duration::from_millis(20))
            .await
            .expect_err("should be closed");
        assert!(matches!(err, SendError::Closed));
    }
}
