//! Bridge from an external message-queue transport to an internal channel.
//!
//! The transport's delivery mechanism hands each raw message to
//! [`bridge::ListenerBridge::on_message`], which converts it to an
//! [`message::InternalMessage`] (propagating transport headers) and forwards
//! it to a [`channel::DestinationChannel`], optionally waiting no longer than
//! a configured timeout for the channel to accept it.

pub mod bridge;
pub mod channel;
pub mod config;
pub mod convert;
pub mod message;
