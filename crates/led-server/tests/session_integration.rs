//! End-to-end tests for the WebSocket session lifecycle.
//!
//! # Purpose
//!
//! These tests exercise the server the way a real client does: over a live
//! TCP socket with a genuine WebSocket handshake. They verify:
//!
//! - The happy path: connect, exchange commands, disconnect, and the
//!   admission slot frees up for the next client.
//! - Admission: a second client is turned away with a clean close while the
//!   first session is active, and the survivor keeps working.
//! - Hardware coupling: the mock pin driver sees exactly one write per
//!   effective state change, idempotent repeats included.
//! - Input robustness: unknown commands are rejected without touching the
//!   pin, and blank frames vanish without a reply.
//! - Shutdown: clearing the running flag stops the accept loop.
//!
//! # The wire conversation
//!
//! ```text
//! Client                              Server
//! ──────                              ──────
//! connect + WebSocket handshake
//!                                     admit (or close if slot taken)
//! "ON"   ────────────────────────▶    drive pin high, commit
//!        ◀────────────────────────    "LED on"
//! "ON"   ────────────────────────▶    already on: silence
//! "STATUS" ──────────────────────▶
//!        ◀────────────────────────    "LED on"
//! close  ────────────────────────▶    release the slot
//! ```
//!
//! # How the harness works
//!
//! Each test binds `127.0.0.1:0` itself so the OS picks a free port, then
//! runs the real accept loop (`serve`) as a background task with a short
//! poll interval to keep the tests fast. The mock output driver records pin
//! writes for assertions. Dropping the test runtime kills the server task,
//! so only the shutdown test needs to join it explicitly.

use std::net::SocketAddr;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio::time::{sleep, timeout};
use tokio_tungstenite::{
    connect_async, tungstenite::Message as WsMessage, MaybeTlsStream, WebSocketStream,
};

use led_server::application::{OutputController, ServerState};
use led_server::infrastructure::gpio::mock::MockOutputController;
use led_server::infrastructure::serve;

type ClientWs = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

// ── Harness ───────────────────────────────────────────────────────────────────

struct Harness {
    addr: SocketAddr,
    state: Arc<ServerState>,
    controller: Arc<MockOutputController>,
    running: Arc<AtomicBool>,
    server: tokio::task::JoinHandle<anyhow::Result<()>>,
}

/// Binds an ephemeral port and runs the real accept loop behind it.
async fn start_server() -> Harness {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("test listener must bind");
    let addr = listener.local_addr().expect("listener must report its address");

    let state = Arc::new(ServerState::new());
    let controller = Arc::new(MockOutputController::new());
    let running = Arc::new(AtomicBool::new(true));

    let server = tokio::spawn(serve(
        listener,
        Duration::from_millis(10),
        Arc::clone(&state),
        Arc::clone(&controller) as Arc<dyn OutputController>,
        Arc::clone(&running),
    ));

    Harness {
        addr,
        state,
        controller,
        running,
        server,
    }
}

async fn connect_client(addr: SocketAddr) -> ClientWs {
    let (ws, _response) = connect_async(format!("ws://{addr}"))
        .await
        .expect("client connect and handshake must succeed");
    ws
}

async fn send_text(ws: &mut ClientWs, text: &str) {
    ws.send(WsMessage::Text(text.to_string()))
        .await
        .expect("client send must succeed");
}

/// Reads frames until a text frame or a closure arrives.
///
/// Returns `None` when the server closed the connection, which is the
/// expected outcome for a rejected client.
async fn recv_text(ws: &mut ClientWs) -> Option<String> {
    loop {
        let frame = match timeout(Duration::from_secs(2), ws.next()).await {
            Ok(Some(Ok(frame))) => frame,
            Ok(Some(Err(_))) | Ok(None) => return None,
            Err(_) => panic!("timed out waiting for a frame"),
        };
        match frame {
            WsMessage::Text(text) => return Some(text),
            WsMessage::Close(_) => return None,
            // Protocol-level ping/pong; not part of the conversation.
            _ => continue,
        }
    }
}

/// Polls `condition` until it holds or a one-second deadline passes.
async fn wait_until(mut condition: impl FnMut() -> bool, what: &str) {
    for _ in 0..200 {
        if condition() {
            return;
        }
        sleep(Duration::from_millis(5)).await;
    }
    panic!("timed out waiting for {what}");
}

// ── Session lifecycle ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_status_round_trip_and_slot_release() {
    // Arrange
    let harness = start_server().await;

    // Act: a fresh client asks for the state before touching anything.
    let mut client = connect_client(harness.addr).await;
    send_text(&mut client, "STATUS").await;
    let reply = recv_text(&mut client).await;

    // Assert: the output starts disengaged.
    assert_eq!(reply.as_deref(), Some("LED off"));
    assert!(harness.state.gate().is_occupied(), "the client holds the slot");

    // Act: disconnect.
    client.close(None).await.expect("client close must succeed");

    // Assert: the slot frees up once the loop notices the closure.
    wait_until(|| !harness.state.gate().is_occupied(), "slot release").await;
}

#[tokio::test]
async fn test_second_client_is_rejected_while_first_is_active() {
    let harness = start_server().await;

    // First client proves its admission with a round-trip.
    let mut first = connect_client(harness.addr).await;
    send_text(&mut first, "STATUS").await;
    assert_eq!(recv_text(&mut first).await.as_deref(), Some("LED off"));

    // Second client handshakes fine, then gets a clean close.
    let mut second = connect_client(harness.addr).await;
    let rejection = recv_text(&mut second).await;
    assert_eq!(rejection, None, "the rejected client must only see a close");

    // The rejection must not have disturbed the first session.
    send_text(&mut first, "STATUS").await;
    assert_eq!(recv_text(&mut first).await.as_deref(), Some("LED off"));
    assert!(
        harness.state.gate().is_occupied(),
        "the first client must still hold the slot"
    );
}

#[tokio::test]
async fn test_slot_frees_for_the_next_client_after_disconnect() {
    let harness = start_server().await;

    // First client engages the LED and leaves.
    let mut first = connect_client(harness.addr).await;
    send_text(&mut first, "ON").await;
    assert_eq!(recv_text(&mut first).await.as_deref(), Some("LED on"));
    first.close(None).await.expect("client close must succeed");
    wait_until(|| !harness.state.gate().is_occupied(), "slot release").await;

    // Second client is admitted and sees the state the first one left behind.
    let mut second = connect_client(harness.addr).await;
    send_text(&mut second, "STATUS").await;
    assert_eq!(
        recv_text(&mut second).await.as_deref(),
        Some("LED on"),
        "output state must survive across sessions"
    );
}

// ── Command semantics over the wire ───────────────────────────────────────────

#[tokio::test]
async fn test_repeated_on_confirms_once_and_drives_the_pin_once() {
    let harness = start_server().await;

    let mut client = connect_client(harness.addr).await;

    // First ON flips the state and earns a confirmation.
    send_text(&mut client, "ON").await;
    assert_eq!(recv_text(&mut client).await.as_deref(), Some("LED on"));

    // Second ON is a no-op; the next reply on the wire must belong to OFF.
    // Replies arrive in order, so this also proves the repeat said nothing.
    send_text(&mut client, "ON").await;
    send_text(&mut client, "OFF").await;
    assert_eq!(recv_text(&mut client).await.as_deref(), Some("LED off"));

    let writes = harness.controller.writes.lock().unwrap();
    assert_eq!(
        *writes,
        vec![true, false],
        "the pin must see one write per effective change"
    );
}

#[tokio::test]
async fn test_unknown_command_is_rejected_without_touching_the_pin() {
    let harness = start_server().await;

    let mut client = connect_client(harness.addr).await;
    send_text(&mut client, "toggle").await;

    let reply = recv_text(&mut client).await.expect("a rejection must be sent");
    assert!(
        reply.contains("TOGGLE"),
        "the rejection must echo the normalized input: {reply}"
    );
    for word in ["ON", "OFF", "STATUS"] {
        assert!(reply.contains(word), "the rejection must name {word}: {reply}");
    }

    // The session survives and the hardware was never touched.
    send_text(&mut client, "STATUS").await;
    assert_eq!(recv_text(&mut client).await.as_deref(), Some("LED off"));
    assert!(harness.controller.writes.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_blank_frames_are_ignored_silently() {
    let harness = start_server().await;

    let mut client = connect_client(harness.addr).await;

    // Blank frames first; if any of them produced a reply it would arrive
    // before the STATUS answer and break the assertion below.
    send_text(&mut client, "").await;
    send_text(&mut client, "   ").await;
    send_text(&mut client, "\r\n").await;
    send_text(&mut client, "STATUS").await;

    assert_eq!(recv_text(&mut client).await.as_deref(), Some("LED off"));
}

#[tokio::test]
async fn test_commands_are_trimmed_and_case_insensitive() {
    let harness = start_server().await;

    let mut client = connect_client(harness.addr).await;

    send_text(&mut client, "  on  ").await;
    assert_eq!(recv_text(&mut client).await.as_deref(), Some("LED on"));

    send_text(&mut client, "Status").await;
    assert_eq!(recv_text(&mut client).await.as_deref(), Some("LED on"));

    send_text(&mut client, "\toFf\r\n").await;
    assert_eq!(recv_text(&mut client).await.as_deref(), Some("LED off"));
}

// ── Shutdown ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_clearing_the_running_flag_stops_the_server() {
    let harness = start_server().await;

    // Act: request shutdown and wait for the accept loop to finish.
    harness.running.store(false, Ordering::Relaxed);
    let result = timeout(Duration::from_secs(2), harness.server)
        .await
        .expect("the accept loop must stop promptly")
        .expect("the server task must not panic");
    assert!(result.is_ok(), "shutdown is not an error: {result:?}");

    // The listener is gone, so new clients cannot connect.
    let refused = connect_async(format!("ws://{}", harness.addr)).await;
    assert!(refused.is_err(), "connections after shutdown must fail");
}
