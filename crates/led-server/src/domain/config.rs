//! Server configuration types.
//!
//! [`ServerConfig`] is the single source of truth for all runtime settings.
//! It can be populated from a TOML file, environment variables, and CLI
//! arguments (see `main.rs` for the merge order), or used with its defaults
//! for local development and tests.
//!
//! # Design rationale
//!
//! Keeping configuration as a plain struct (no global state, no environment
//! variable reads inside the domain) makes the server easy to embed in
//! integration tests: bind an ephemeral port, hand the struct over, done.
//! The infrastructure layer is responsible for populating the struct.

use std::net::SocketAddr;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

/// Errors produced when validating a [`ServerConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The bind address + port did not form a valid socket address.
    #[error("invalid bind address '{value}': {reason}")]
    InvalidBindAddress { value: String, reason: String },

    /// The uplink probe address could not be parsed.
    #[error("invalid uplink probe address '{value}': {reason}")]
    InvalidProbeAddress { value: String, reason: String },

    /// The receive-poll cadence was configured as zero.
    #[error("poll interval must be at least 1 ms")]
    ZeroPollInterval,
}

/// All runtime configuration for the LED server.
///
/// Every field carries a serde default so a TOML file only needs to name the
/// settings it overrides:
///
/// ```toml
/// port = 9001
/// gpio_pin = 22
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ServerConfig {
    /// IP address the WebSocket listener binds to.
    ///
    /// `0.0.0.0` accepts connections from any network interface (LAN +
    /// localhost). Set to `127.0.0.1` to accept only local connections.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// TCP port the WebSocket listener binds to.
    #[serde(default = "default_port")]
    pub port: u16,

    /// BCM number of the GPIO pin wired to the output load.
    #[serde(default = "default_gpio_pin")]
    pub gpio_pin: u8,

    /// Whether the output line is wired active-low (driving the pin low
    /// turns the load on). Common for relay boards.
    #[serde(default)]
    pub active_low: bool,

    /// Session receive-poll cadence in milliseconds.
    ///
    /// The session loop sleeps this long between non-blocking receive
    /// attempts. Lower values reduce command latency at the cost of more
    /// wakeups on an otherwise idle device.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Address probed at startup to decide whether the network uplink is
    /// usable. No packets are sent; the OS is only asked for a route.
    #[serde(default = "default_uplink_probe")]
    pub uplink_probe: String,
}

impl ServerConfig {
    /// Resolves the WebSocket listener's socket address.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBindAddress`] when `bind_address` and
    /// `port` do not combine into a parseable socket address.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let value = format!("{}:{}", self.bind_address, self.port);
        value
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::InvalidBindAddress {
                value,
                reason: e.to_string(),
            })
    }

    /// Resolves the uplink probe's socket address.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidProbeAddress`] when `uplink_probe` is
    /// not a parseable socket address.
    pub fn probe_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.uplink_probe
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::InvalidProbeAddress {
                value: self.uplink_probe.clone(),
                reason: e.to_string(),
            })
    }

    /// The receive-poll cadence as a [`Duration`].
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Checks the whole configuration at once.
    ///
    /// Called once in `main` after the merge so that a typo in the config
    /// file fails fast at startup instead of deep inside the accept loop.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.bind_addr()?;
        self.probe_addr()?;
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::ZeroPollInterval);
        }
        Ok(())
    }
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8765
}
fn default_gpio_pin() -> u8 {
    17
}
fn default_poll_interval_ms() -> u64 {
    50
}
fn default_uplink_probe() -> String {
    // A well-known public resolver; only the route lookup matters.
    "8.8.8.8:53".to_string()
}

impl Default for ServerConfig {
    /// Returns a `ServerConfig` suitable for a stock Raspberry Pi deployment.
    ///
    /// | Field            | Default       |
    /// |------------------|---------------|
    /// | bind_address     | `0.0.0.0`     |
    /// | port             | `8765`        |
    /// | gpio_pin         | `17`          |
    /// | active_low       | `false`       |
    /// | poll_interval_ms | `50`          |
    /// | uplink_probe     | `8.8.8.8:53`  |
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
            gpio_pin: default_gpio_pin(),
            active_low: false,
            poll_interval_ms: default_poll_interval_ms(),
            uplink_probe: default_uplink_probe(),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
