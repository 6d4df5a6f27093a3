//! Mock output driver for unit testing and non-Pi hosts.
//!
//! # Why a mock driver?
//!
//! The real driver ([`GpioOutputController`](super::pi::GpioOutputController))
//! talks to the Raspberry Pi GPIO character device, which:
//!
//! - Only exists on a Pi running Linux.
//! - Actually drives current through whatever is wired to the pin.
//! - Cannot be observed directly from Rust test code.
//!
//! The `MockOutputController` replaces the hardware call with in-memory
//! recording. Each write is pushed into a `Mutex<Vec<bool>>` so that test
//! assertions can inspect exactly what was driven and in what order.
//!
//! It doubles as the runtime driver on development machines: `build_controller`
//! falls back to it off-Linux, and `--mock-gpio` forces it anywhere.
//!
//! # Usage in tests
//!
//! ```ignore
//! let controller = MockOutputController::new();
//!
//! controller.set_engaged(true).unwrap();
//!
//! // Assert that exactly one write happened, and that it was "on".
//! let writes = controller.writes.lock().unwrap();
//! assert_eq!(*writes, vec![true]);
//! ```
//!
//! # `should_fail` flag
//!
//! Set `should_fail = true` before calling `set_engaged` to simulate a broken
//! pin. This lets you test the session-fatal hardware path without needing
//! broken hardware.

use std::sync::Mutex;

use tracing::debug;

use crate::application::{OutputController, OutputError};

/// A mock driver that records all writes without touching hardware.
///
/// The record lives in a `Mutex<Vec<bool>>` so tests can safely share the
/// controller across tasks (e.g., when wrapping it in an `Arc`).
#[derive(Default)]
pub struct MockOutputController {
    /// Records each engaged value passed to `set_engaged`, in call order.
    pub writes: Mutex<Vec<bool>>,
    /// When `true`, every call immediately returns an `OutputError::Hardware`.
    /// Use this to test error-handling paths in callers.
    pub should_fail: bool,
}

impl MockOutputController {
    /// Creates a new `MockOutputController` with no writes and `should_fail = false`.
    pub fn new() -> Self {
        Self::default()
    }
}

impl OutputController for MockOutputController {
    /// Records the write, or returns an error if `should_fail` is set.
    fn set_engaged(&self, engaged: bool) -> Result<(), OutputError> {
        if self.should_fail {
            return Err(OutputError::Hardware("mock failure".into()));
        }
        self.writes.lock().unwrap().push(engaged);
        debug!("mock output set to {engaged}");
        Ok(())
    }
}
