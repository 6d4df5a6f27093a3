//! WebSocket listener: accept loop, handshake, and admission hand-off.
//!
//! This module is responsible for:
//!
//! 1. Binding a TCP listener on the configured address.
//! 2. Accepting incoming TCP connections.
//! 3. Upgrading each connection to a WebSocket session.
//! 4. Asking the [`SessionGate`](crate::application::SessionGate) for the
//!    single session slot, and closing the connection cleanly when it is taken.
//! 5. Handing admitted connections to the session loop.
//! 6. Shutting down when the `running` flag is cleared.
//!
//! # One client at a time
//!
//! Every accepted connection still gets its own Tokio task, so the listener
//! is never blocked by a slow handshake. Concurrency control lives in the
//! admission gate, not here: extra connections get through the handshake,
//! lose the admission race, and are closed immediately. That ordering is
//! deliberate. Rejecting before the handshake would surface as a generic
//! network error in the client; rejecting after it gives a clean WebSocket
//! close.
//!
//! # Portability
//!
//! Uses only `tokio::net` APIs. Shutdown is triggered by a shared `AtomicBool`
//! set by a Ctrl+C signal handler (see `main.rs`), which is also
//! cross-platform, even though the GPIO half of the server is Pi-only.

use std::net::SocketAddr;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use anyhow::Context;
use tokio::net::{TcpListener, TcpStream};
use tokio::time::{sleep, timeout, Instant};
use tokio_tungstenite::accept_async;
use tracing::{error, info, warn};

use led_core::SessionChannel;

use crate::application::{run_session, OutputController, ServerState, SessionEnd};
use crate::domain::ServerConfig;
use crate::infrastructure::ws_channel::WsChannel;

// ── Public API ────────────────────────────────────────────────────────────────

/// Binds the configured address and runs the accept loop until `running` is
/// cleared.
///
/// # Errors
///
/// Returns an error if the bind address is malformed or the TCP listener
/// cannot be bound (e.g., the port is already in use).
pub async fn run_server(
    config: &ServerConfig,
    state: Arc<ServerState>,
    controller: Arc<dyn OutputController>,
    running: Arc<AtomicBool>,
) -> anyhow::Result<()> {
    let bind_addr = config.bind_addr()?;
    let listener = TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("failed to bind WebSocket listener on {bind_addr}"))?;

    info!("LED server listening on ws://{bind_addr}");

    serve(listener, config.poll_interval(), state, controller, running).await
}

/// Runs the accept loop on an already-bound listener.
///
/// Split out from [`run_server`] so tests can bind port 0 themselves and learn
/// the ephemeral port before the loop starts.
pub async fn serve(
    listener: TcpListener,
    poll_interval: Duration,
    state: Arc<ServerState>,
    controller: Arc<dyn OutputController>,
    running: Arc<AtomicBool>,
) -> anyhow::Result<()> {
    loop {
        if !running.load(Ordering::Relaxed) {
            info!("shutdown flag set; stopping accept loop");
            break;
        }

        // A short timeout on `accept()` lets the loop re-check the `running`
        // flag even when no clients are connecting.
        let accept_result = timeout(Duration::from_millis(200), listener.accept()).await;

        match accept_result {
            Ok(Ok((stream, peer_addr))) => {
                info!("new connection from {peer_addr}");
                let state = Arc::clone(&state);
                let controller = Arc::clone(&controller);
                let running = Arc::clone(&running);

                // One task per connection; losers of the admission race just
                // handshake, get closed, and exit.
                tokio::spawn(async move {
                    handle_connection(stream, peer_addr, poll_interval, state, controller, running)
                        .await;
                });
            }
            Ok(Err(e)) => {
                // Transient accept error (e.g., too many open file
                // descriptors). Log it and continue rather than crashing.
                error!("accept error: {e}");
            }
            Err(_) => {
                // Timeout; loop back to check the running flag.
            }
        }
    }

    // The session loop sees the cleared flag within one poll interval; wait
    // for it to vacate the slot so teardown logs land before we return.
    let deadline = Instant::now() + poll_interval * 4 + Duration::from_millis(100);
    while state.gate().is_occupied() && Instant::now() < deadline {
        sleep(Duration::from_millis(10)).await;
    }

    Ok(())
}

// ── Per-connection handler ────────────────────────────────────────────────────

/// Top-level handler for a single connection.
///
/// Wraps [`establish_session`] and logs the outcome. Using a separate
/// outer/inner function pair lets the inner one use `?` for clean error
/// propagation while this one turns every ending into a log line.
async fn handle_connection(
    raw_stream: TcpStream,
    peer_addr: SocketAddr,
    poll_interval: Duration,
    state: Arc<ServerState>,
    controller: Arc<dyn OutputController>,
    running: Arc<AtomicBool>,
) {
    match establish_session(raw_stream, peer_addr, poll_interval, state, controller, running).await
    {
        Ok(Some(end)) => info!("session {peer_addr} ended: {end}"),
        Ok(None) => info!("connection {peer_addr} rejected: session slot occupied"),
        Err(e) => warn!("connection {peer_addr} failed: {e:#}"),
    }
}

/// Handshakes, admits, and runs one connection to completion.
///
/// Returns `Ok(None)` when the admission slot was occupied (the expected
/// outcome for every client beyond the first) and `Ok(Some(end))` with the
/// session's ending otherwise.
async fn establish_session(
    raw_stream: TcpStream,
    peer_addr: SocketAddr,
    poll_interval: Duration,
    state: Arc<ServerState>,
    controller: Arc<dyn OutputController>,
    running: Arc<AtomicBool>,
) -> anyhow::Result<Option<SessionEnd>> {
    // `accept_async` reads the client's HTTP Upgrade request and sends the
    // "101 Switching Protocols" response; after it the stream speaks
    // WebSocket frames.
    let ws_stream = accept_async(raw_stream)
        .await
        .with_context(|| format!("WebSocket handshake failed with {peer_addr}"))?;

    let mut channel = WsChannel::new(ws_stream);

    let Some(permit) = state.gate().try_admit() else {
        channel.close().await;
        return Ok(None);
    };

    info!("session {peer_addr} admitted (permit {})", permit.id());

    let end = run_session(
        &mut channel,
        &permit,
        &state,
        controller.as_ref(),
        poll_interval,
        &running,
    )
    .await;

    Ok(Some(end))
}
