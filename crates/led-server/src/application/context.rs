//! ServerState: process-scoped shared state.
//!
//! One instance is created in `main`, wrapped in an `Arc`, and handed to the
//! accept loop and every session task. It owns the two pieces of state the
//! whole process shares: the logical output value and the admission gate.
//!
//! # Why an atomic and not a mutex for the output?
//!
//! The [`SessionGate`] already guarantees at most one active session, and
//! only that session's loop ever writes the output state. A plain atomic
//! boolean is therefore enough; `Relaxed` ordering suffices because the one
//! writer and any diagnostic readers do not need to synchronise other memory.

use std::sync::atomic::{AtomicBool, Ordering};

use led_core::OutputState;

use crate::application::admission::SessionGate;

/// Shared state owned by the process: the output flag and the admission gate.
///
/// The output flag is initialised to disengaged at construction, matching the
/// physical line, which `main` drives low before accepting connections.
#[derive(Debug, Default)]
pub struct ServerState {
    /// Logical state of the output line. Sole writer: the admitted session.
    engaged: AtomicBool,
    /// The single-occupancy admission gate.
    gate: SessionGate,
}

impl ServerState {
    /// Creates the process state: output disengaged, gate vacant.
    pub fn new() -> Self {
        Self::default()
    }

    /// The admission gate.
    pub fn gate(&self) -> &SessionGate {
        &self.gate
    }

    /// Reads the current logical output state.
    pub fn output(&self) -> OutputState {
        OutputState::from_engaged(self.engaged.load(Ordering::Relaxed))
    }

    /// Commits a new logical output state.
    ///
    /// Callers apply the value to hardware first and commit only on success,
    /// so `STATUS` never reports a value the pin refused.
    pub fn commit_output(&self, state: OutputState) {
        self.engaged.store(state.is_engaged(), Ordering::Relaxed);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
