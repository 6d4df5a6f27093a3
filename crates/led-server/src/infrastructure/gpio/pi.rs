//! Raspberry Pi GPIO output driver via `rppal`.
//!
//! # BCM pin numbering (for beginners)
//!
//! `rppal` addresses pins by their Broadcom (BCM) GPIO number, not by their
//! position on the 40-pin header. BCM 17, the default here, sits on physical
//! pin 11. Wiring an LED there means: pin 11 → resistor (≈330 Ω) → LED anode,
//! LED cathode → any ground pin.
//!
//! # Active-low wiring
//!
//! Some boards and relay modules light up when the pin is pulled *low*. The
//! `active_low` switch inverts the electrical level without changing what
//! "engaged" means anywhere else in the server:
//!
//! | `engaged` | `active_low` | pin level |
//! |-----------|--------------|-----------|
//! | true      | false        | high      |
//! | false     | false        | low       |
//! | true      | true         | low       |
//! | false     | true         | high      |
//!
//! # Permissions
//!
//! `rppal` opens `/dev/gpiomem`, which is writable by the `gpio` group on
//! Raspberry Pi OS. If the process lacks access the constructor fails with a
//! `Hardware` error rather than panicking, so the caller can report it.

use std::sync::Mutex;

use rppal::gpio::{Gpio, OutputPin};

use crate::application::{OutputController, OutputError};

/// Drives one GPIO line on the Pi header.
///
/// The pin handle lives behind a `Mutex` because `rppal` writes need `&mut`
/// while the [`OutputController`] trait takes `&self` so the controller can be
/// shared behind an `Arc`.
pub struct GpioOutputController {
    pin: Mutex<OutputPin>,
    active_low: bool,
}

impl GpioOutputController {
    /// Claims `pin` (BCM numbering) as an output line.
    ///
    /// Fails if the GPIO controller is unavailable (not a Pi, or missing
    /// `/dev/gpiomem` access) or if the pin is already claimed elsewhere.
    pub fn new(pin: u8, active_low: bool) -> Result<Self, OutputError> {
        let gpio = Gpio::new()
            .map_err(|e| OutputError::Hardware(format!("GPIO controller unavailable: {e}")))?;
        let pin = gpio
            .get(pin)
            .map_err(|e| OutputError::Hardware(format!("BCM pin {pin} unavailable: {e}")))?
            .into_output();
        Ok(Self {
            pin: Mutex::new(pin),
            active_low,
        })
    }
}

impl OutputController for GpioOutputController {
    fn set_engaged(&self, engaged: bool) -> Result<(), OutputError> {
        let mut pin = self.pin.lock().expect("lock poisoned");
        // Engaged drives the pin high unless the LED is wired active-low.
        if engaged != self.active_low {
            pin.set_high();
        } else {
            pin.set_low();
        }
        Ok(())
    }
}
