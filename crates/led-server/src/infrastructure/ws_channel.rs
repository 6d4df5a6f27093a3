//! WebSocket adapter for the session channel.
//!
//! Wraps a `tokio_tungstenite::WebSocketStream` behind the transport-neutral
//! [`SessionChannel`] trait so the session loop never sees WebSocket frames.
//!
//! # Non-blocking receive (for beginners)
//!
//! The session loop polls on a fixed cadence instead of awaiting the socket,
//! so `try_receive` must return immediately whether or not a frame is ready.
//! `FutureExt::now_or_never()` does exactly that: it polls the `next()` future
//! once and gives back `None` if the future would have to wait. A frame that
//! is already buffered is returned on the spot; anything still in flight shows
//! up on a later poll.
//!
//! # Frame translation
//!
//! | WebSocket frame        | Poll result                      |
//! |------------------------|----------------------------------|
//! | Text                   | `Message(text)`                  |
//! | Close                  | `Closed`                         |
//! | Ping / Pong            | `Empty` (protocol-level, logged) |
//! | Binary                 | `Empty` (unexpected, warned)     |
//! | stream ended (`None`)  | `Closed`                         |
//!
//! Protocol violations and closed-connection errors also map to `Closed`; any
//! other error is surfaced as a transient [`ChannelError::Receive`] and the
//! channel stays open, leaving the swallow-or-not decision to the caller.

use async_trait::async_trait;
use futures_util::{FutureExt, SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_tungstenite::{
    tungstenite::{Error as WsError, Message as WsMessage},
    WebSocketStream,
};
use tracing::{debug, warn};

use led_core::{ChannelError, InboundPoll, SessionChannel};

/// A live WebSocket session viewed through the [`SessionChannel`] trait.
///
/// Generic over the underlying I/O so tests can run it over an in-memory
/// duplex pipe instead of a real TCP stream.
pub struct WsChannel<S> {
    ws: WebSocketStream<S>,
    open: bool,
}

impl<S> WsChannel<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    /// Wraps an already-handshaken WebSocket stream.
    pub fn new(ws: WebSocketStream<S>) -> Self {
        Self { ws, open: true }
    }
}

#[async_trait]
impl<S> SessionChannel for WsChannel<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    async fn try_send(&mut self, text: &str) -> Result<(), ChannelError> {
        if !self.open {
            return Err(ChannelError::Send("session channel is closed".to_string()));
        }
        self.ws
            .send(WsMessage::Text(text.to_string()))
            .await
            .map_err(|e| {
                self.open = false;
                ChannelError::Send(e.to_string())
            })
    }

    async fn try_receive(&mut self) -> Result<InboundPoll, ChannelError> {
        if !self.open {
            return Ok(InboundPoll::Closed);
        }

        // Poll the stream exactly once; a pending frame means nothing is
        // buffered right now.
        let Some(next) = self.ws.next().now_or_never() else {
            return Ok(InboundPoll::Empty);
        };

        match next {
            Some(Ok(WsMessage::Text(text))) => Ok(InboundPoll::Message(text)),
            Some(Ok(WsMessage::Close(_))) => {
                debug!("WebSocket Close frame received");
                self.open = false;
                Ok(InboundPoll::Closed)
            }
            Some(Ok(WsMessage::Ping(data))) => {
                // tokio-tungstenite queues the Pong reply automatically.
                debug!("WebSocket ping ({} bytes)", data.len());
                Ok(InboundPoll::Empty)
            }
            Some(Ok(WsMessage::Pong(_))) => {
                debug!("WebSocket pong received");
                Ok(InboundPoll::Empty)
            }
            Some(Ok(WsMessage::Binary(_))) => {
                // The client-facing protocol is text-only.
                warn!("unexpected binary WebSocket frame (ignored)");
                Ok(InboundPoll::Empty)
            }
            Some(Ok(WsMessage::Frame(_))) => {
                debug!("raw frame (ignored)");
                Ok(InboundPoll::Empty)
            }
            Some(Err(WsError::ConnectionClosed | WsError::AlreadyClosed | WsError::Protocol(_))) => {
                self.open = false;
                Ok(InboundPoll::Closed)
            }
            Some(Err(e)) => Err(ChannelError::Receive(e.to_string())),
            None => {
                self.open = false;
                Ok(InboundPoll::Closed)
            }
        }
    }

    fn is_open(&self) -> bool {
        self.open
    }

    async fn close(&mut self) {
        if self.open {
            // Best effort; the peer may already be gone.
            let _ = self.ws.close(None).await;
            self.open = false;
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use tokio::io::DuplexStream;
    use tokio_test::assert_ok;
    use tokio_tungstenite::tungstenite::protocol::Role;

    /// Builds a connected server channel / client stream pair over an
    /// in-memory pipe. `from_raw_socket` skips the HTTP handshake, which the
    /// listener performs separately in production.
    async fn ws_pair() -> (WsChannel<DuplexStream>, WebSocketStream<DuplexStream>) {
        let (server_io, client_io) = tokio::io::duplex(4096);
        let server = WebSocketStream::from_raw_socket(server_io, Role::Server, None).await;
        let client = WebSocketStream::from_raw_socket(client_io, Role::Client, None).await;
        (WsChannel::new(server), client)
    }

    /// Polls until something other than `Empty` comes back, mimicking the
    /// session loop's cadence so frame delivery timing cannot flake the test.
    async fn receive_soon(channel: &mut WsChannel<DuplexStream>) -> InboundPoll {
        for _ in 0..100 {
            match channel.try_receive().await {
                Ok(InboundPoll::Empty) => tokio::time::sleep(Duration::from_millis(2)).await,
                Ok(other) => return other,
                Err(e) => panic!("unexpected receive error: {e}"),
            }
        }
        panic!("no frame arrived within the polling window");
    }

    #[tokio::test]
    async fn test_empty_when_no_frame_is_waiting() {
        let (mut channel, _client) = ws_pair().await;

        let poll = channel.try_receive().await.expect("poll must not error");

        assert!(matches!(poll, InboundPoll::Empty));
        assert!(channel.is_open());
    }

    #[tokio::test]
    async fn test_text_frame_surfaces_as_message() {
        let (mut channel, mut client) = ws_pair().await;

        client
            .send(WsMessage::Text("STATUS".to_string()))
            .await
            .expect("client send must succeed");

        let poll = receive_soon(&mut channel).await;
        match poll {
            InboundPoll::Message(text) => assert_eq!(text, "STATUS"),
            other => panic!("expected Message, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_client_close_reports_closed() {
        let (mut channel, mut client) = ws_pair().await;

        client.close(None).await.expect("client close must succeed");

        let poll = receive_soon(&mut channel).await;
        assert!(matches!(poll, InboundPoll::Closed));
        assert!(!channel.is_open(), "a Close frame must mark the channel closed");
    }

    #[tokio::test]
    async fn test_binary_frames_are_skipped_not_fatal() {
        let (mut channel, mut client) = ws_pair().await;

        client
            .send(WsMessage::Binary(vec![0x01, 0x02, 0x03]))
            .await
            .expect("client send must succeed");
        client
            .send(WsMessage::Text("ON".to_string()))
            .await
            .expect("client send must succeed");

        // The binary frame maps to Empty, so the next non-empty poll must be
        // the text that followed it.
        let poll = receive_soon(&mut channel).await;
        match poll {
            InboundPoll::Message(text) => assert_eq!(text, "ON"),
            other => panic!("expected the text after the binary frame, got {other:?}"),
        }
        assert!(channel.is_open());
    }

    #[tokio::test]
    async fn test_try_send_writes_a_text_frame() {
        let (mut channel, mut client) = ws_pair().await;

        tokio_test::assert_ok!(channel.try_send("LED on").await);

        let frame = client
            .next()
            .await
            .expect("client must see a frame")
            .expect("frame must decode");
        assert_eq!(frame, WsMessage::Text("LED on".to_string()));
    }

    #[tokio::test]
    async fn test_send_after_close_is_rejected() {
        let (mut channel, _client) = ws_pair().await;

        channel.close().await;
        let result = channel.try_send("LED on").await;

        assert!(matches!(result, Err(ChannelError::Send(_))));
        assert!(!channel.is_open());
    }

    #[tokio::test]
    async fn test_close_is_idempotent() {
        let (mut channel, _client) = ws_pair().await;

        channel.close().await;
        channel.close().await;

        assert!(!channel.is_open());
        let poll = channel.try_receive().await.expect("poll must not error");
        assert!(matches!(poll, InboundPoll::Closed));
    }
}
