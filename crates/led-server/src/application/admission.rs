//! SessionGate: the single-occupancy admission gate.
//!
//! The whole server supports exactly one active session. The gate is the one
//! place that invariant is enforced: a connection either atomically occupies
//! the slot and receives a [`SessionPermit`], or it is turned away and must
//! reconnect later to compete again. There is no queueing and no retry.
//!
//! # Why a permit type?
//!
//! `release` must only clear the slot for the session that actually holds it.
//! Handing the admitted caller an unforgeable permit (a UUID the gate
//! generated) makes double-release and release-after-reuse races harmless:
//! releasing a stale permit is a no-op because the slot no longer holds that
//! id. The UUID doubles as the session's log correlation id.

use std::sync::Mutex;

use tracing::debug;
use uuid::Uuid;

/// Proof that one connection currently holds the session slot.
///
/// Deliberately not `Clone`: at most one live permit exists per admission.
#[derive(Debug, PartialEq, Eq)]
pub struct SessionPermit {
    id: Uuid,
}

impl SessionPermit {
    /// The permit's unique id, used to correlate log lines for one session.
    pub fn id(&self) -> Uuid {
        self.id
    }
}

/// The single-occupancy admission gate.
///
/// Internally a mutex-guarded `Option<Uuid>`: `None` means vacant, `Some(id)`
/// means the session holding the permit with that id is active. The mutex
/// makes check-and-occupy atomic with respect to concurrently accepted
/// connections racing for the slot.
#[derive(Debug, Default)]
pub struct SessionGate {
    slot: Mutex<Option<Uuid>>,
}

impl SessionGate {
    /// Creates a vacant gate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attempts to occupy the session slot.
    ///
    /// Returns `Some(permit)` when the slot was vacant and is now held by the
    /// caller, or `None` when another session is active. Rejection is
    /// terminal for this connection attempt; the caller must close the
    /// channel without further interaction.
    pub fn try_admit(&self) -> Option<SessionPermit> {
        let mut slot = self.slot.lock().expect("lock poisoned");
        if slot.is_some() {
            return None;
        }
        let id = Uuid::new_v4();
        *slot = Some(id);
        debug!("session slot occupied by {id}");
        Some(SessionPermit { id })
    }

    /// Vacates the slot if and only if it is still held by `permit`.
    ///
    /// Idempotent: releasing a permit that no longer holds the slot (double
    /// release, or release after the slot moved on to a newer session) is a
    /// silent no-op.
    pub fn release(&self, permit: &SessionPermit) {
        let mut slot = self.slot.lock().expect("lock poisoned");
        if *slot == Some(permit.id) {
            *slot = None;
            debug!("session slot released by {}", permit.id);
        }
    }

    /// Whether a session currently holds the slot.
    pub fn is_occupied(&self) -> bool {
        self.slot.lock().expect("lock poisoned").is_some()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
