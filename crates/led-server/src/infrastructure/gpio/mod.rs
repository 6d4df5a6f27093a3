//! Output drivers for the LED line.
//!
//! The real driver talks to the Raspberry Pi GPIO header and is selected at
//! compile time via `#[cfg(target_os = ...)]`; every other platform falls back
//! to the in-memory mock so the server stays runnable on a developer laptop.

pub mod mock;

#[cfg(target_os = "linux")]
pub mod pi;

use std::sync::Arc;

use tracing::info;

use crate::application::{OutputController, OutputError};
use mock::MockOutputController;

/// Selects and initialises the output driver for this host.
///
/// On Linux the Raspberry Pi driver is used unless `force_mock` is set (the
/// `--mock-gpio` flag). Everywhere else the mock driver is the only option.
pub fn build_controller(
    pin: u8,
    active_low: bool,
    force_mock: bool,
) -> Result<Arc<dyn OutputController>, OutputError> {
    #[cfg(target_os = "linux")]
    if !force_mock {
        let controller = pi::GpioOutputController::new(pin, active_low)?;
        info!("GPIO output driver ready on BCM pin {pin} (active_low = {active_low})");
        return Ok(Arc::new(controller));
    }

    #[cfg(not(target_os = "linux"))]
    let _ = (pin, active_low);

    if force_mock {
        info!("mock output driver selected (--mock-gpio)");
    } else {
        info!("no GPIO support on this platform; using mock output driver");
    }
    Ok(Arc::new(MockOutputController::new()))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
