//! The session loop: poll, dispatch, reply, tear down.
//!
//! One invocation of [`run_session`] owns one admitted connection for its
//! whole life. The loop is a simple four-state machine:
//!
//! ```text
//!                    ┌──────────────────┐
//!        ┌──────────▶│ AwaitingMessage  │───── nothing ready / ──┐
//!        │           └────────┬─────────┘      transient fault   │
//!        │                    │ text arrived        (loop again) │
//!        │           ┌────────▼─────────┐                        │
//!        └───────────│   Dispatching    │◀───────────────────────┘
//!          replied / └────────┬─────────┘
//!          nothing to say     │ peer closed, send failed,
//!                             │ hardware failed, shutdown
//!                    ┌────────▼─────────┐
//!                    │     Closing      │  close channel (best effort),
//!                    └────────┬─────────┘  release the admission slot
//!                    ┌────────▼─────────┐
//!                    │    Terminated    │  control returns to the listener
//!                    └──────────────────┘
//! ```
//!
//! Two policies are deliberate and load-bearing:
//!
//! - **Transient receive faults are swallowed.** A receive error is logged
//!   and the loop keeps polling; only an explicit close ends the session
//!   from the receive side. This keeps a flaky client connected instead of
//!   dropping it on the first hiccup.
//! - **The slot is always released.** Every exit path funnels through the
//!   same teardown, so a crash-free session can never leak the admission
//!   slot and lock out all future clients.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use led_core::{dispatch, InboundPoll, SessionChannel};
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::application::admission::SessionPermit;
use crate::application::context::ServerState;
use crate::application::output::OutputController;

/// Why a session ended. Always produced; never fatal to the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The peer closed the connection. The expected, normal ending.
    PeerClosed,
    /// Writing a reply failed; the connection is presumed dead.
    SendFailed,
    /// The hardware driver refused a state change.
    OutputFailed,
    /// The process is shutting down and asked the loop to stop.
    Shutdown,
}

impl fmt::Display for SessionEnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SessionEnd::PeerClosed => "peer closed the connection",
            SessionEnd::SendFailed => "reply send failed",
            SessionEnd::OutputFailed => "output hardware failed",
            SessionEnd::Shutdown => "server shutdown",
        };
        f.write_str(text)
    }
}

/// Runs one admitted session to completion and tears it down.
///
/// Polls the channel at `poll_interval`, dispatches each inbound text against
/// the shared output state, applies effective changes through `controller`
/// (hardware first, commit second), and writes any reply back. On every exit
/// path the channel is closed best-effort and the admission slot is released,
/// so the caller only has to log the returned [`SessionEnd`].
pub async fn run_session<C: SessionChannel>(
    channel: &mut C,
    permit: &SessionPermit,
    state: &ServerState,
    controller: &dyn OutputController,
    poll_interval: Duration,
    running: &AtomicBool,
) -> SessionEnd {
    let end = drive_session(channel, permit, state, controller, poll_interval, running).await;

    // Closing: best-effort close, then vacate the slot. Runs for every exit.
    channel.close().await;
    state.gate().release(permit);

    end
}

/// The AwaitingMessage/Dispatching loop. Separated from [`run_session`] so
/// early returns cannot skip the teardown in the caller.
async fn drive_session<C: SessionChannel>(
    channel: &mut C,
    permit: &SessionPermit,
    state: &ServerState,
    controller: &dyn OutputController,
    poll_interval: Duration,
    running: &AtomicBool,
) -> SessionEnd {
    let session = permit.id();

    loop {
        // Yield for the polling cadence before each receive attempt, keeping
        // the process responsive while this session idles.
        sleep(poll_interval).await;

        if !running.load(Ordering::Relaxed) {
            info!("session {session}: stopping for shutdown");
            return SessionEnd::Shutdown;
        }
        if !channel.is_open() {
            return SessionEnd::PeerClosed;
        }

        let text = match channel.try_receive().await {
            Ok(InboundPoll::Message(text)) => text,
            Ok(InboundPoll::Empty) => continue,
            Ok(InboundPoll::Closed) => return SessionEnd::PeerClosed,
            Err(e) => {
                // Transient by contract: log it and keep polling.
                warn!("session {session}: receive fault ignored: {e}");
                continue;
            }
        };

        debug!("session {session}: received {text:?}");

        let current = state.output();
        let (next, outcome) = dispatch(current, &text);

        if next != current {
            // Hardware first, commit second, so STATUS never reports a value
            // the pin refused.
            if let Err(e) = controller.set_engaged(next.is_engaged()) {
                error!("session {session}: failed to drive output: {e}");
                return SessionEnd::OutputFailed;
            }
            state.commit_output(next);
            info!("session {session}: output now {}", next.status_text());
        }

        if let Some(reply) = outcome.reply() {
            if let Err(e) = channel.try_send(reply).await {
                warn!("session {session}: reply send failed: {e}");
                return SessionEnd::SendFailed;
            }
            debug!("session {session}: sent {reply:?}");
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
