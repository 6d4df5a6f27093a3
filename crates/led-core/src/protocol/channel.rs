//! SessionChannel: the contract between the session loop and a transport.
//!
//! The session loop never encodes or decodes wire frames itself; it drives a
//! [`SessionChannel`] trait object and leaves handshaking and framing to the
//! infrastructure layer (the WebSocket implementation lives in the server
//! crate). Keeping the trait here lets the loop be unit-tested against
//! scripted in-memory channels.

use async_trait::async_trait;
use thiserror::Error;

/// Result of one non-blocking receive attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundPoll {
    /// A complete text message arrived.
    Message(String),
    /// No message was ready. Poll again after the cadence interval.
    Empty,
    /// The peer closed the connection, or it is already gone.
    Closed,
}

/// Errors surfaced by a session channel.
#[derive(Debug, Error)]
pub enum ChannelError {
    /// Sending a reply failed. The session cannot continue.
    #[error("failed to send on session channel: {0}")]
    Send(String),
    /// A transient receive fault. The session keeps polling.
    #[error("transient receive fault on session channel: {0}")]
    Receive(String),
}

/// One admitted, handshake-complete, message-framed connection.
///
/// `try_receive` must not block: when no message is ready it reports
/// [`InboundPoll::Empty`] immediately so the session loop can keep its
/// polling cadence. A receive error is transient by contract: the loop logs
/// it and polls again. A send error ends the session. Closure is not an error
/// at all; it is reported in-band as [`InboundPoll::Closed`].
#[async_trait]
pub trait SessionChannel: Send {
    /// Sends one text message to the peer.
    async fn try_send(&mut self, text: &str) -> Result<(), ChannelError>;

    /// Attempts to receive one text message without blocking.
    async fn try_receive(&mut self) -> Result<InboundPoll, ChannelError>;

    /// Whether the channel is still open for traffic.
    fn is_open(&self) -> bool;

    /// Closes the channel. Teardown is best-effort, so failures are ignored.
    async fn close(&mut self);
}
