//! OutputController: the seam between the session loop and real hardware.
//!
//! This use-case-facing trait is deliberately tiny: the session loop only
//! ever needs to drive the line to a logical value. Pin numbering, polarity,
//! and register access are infrastructure concerns; implementations live in
//! `infrastructure::gpio` (an rppal driver on Linux, a recording mock
//! everywhere else).

use thiserror::Error;

/// Error type for output line operations.
#[derive(Debug, Error)]
pub enum OutputError {
    /// The hardware layer refused the write (GPIO init failure, kernel
    /// interface gone, a mock configured to fail).
    #[error("output hardware error: {0}")]
    Hardware(String),
}

/// Hardware-agnostic digital output line.
///
/// `set_engaged(true)` means "turn the load on" regardless of wiring; an
/// active-low line inverts internally. A failure is session-fatal for the
/// caller: the physical write is never retried.
pub trait OutputController: Send + Sync {
    /// Drives the output line to the requested logical value.
    fn set_engaged(&self, engaged: bool) -> Result<(), OutputError>;
}
