//! Infrastructure layer for the LED server.
//!
//! The infrastructure layer handles all I/O: accepting WebSocket connections,
//! driving the GPIO pin, probing the network uplink, and reading the config
//! file.
//!
//! # Responsibilities
//!
//! - Binding a TCP listener and performing the WebSocket upgrade handshake
//! - Adapting a WebSocket stream to the transport-neutral session channel
//! - Driving the physical output line (or its mock stand-in)
//! - Waiting for the network uplink before the listener starts
//! - Loading the optional TOML config file
//!
//! # What does NOT belong here?
//!
//! - Admission and session-loop logic (that is the application layer)
//! - Command parsing and dispatch (that is `led_core`)
//! - Configuration schema and validation (that is the domain layer)
//!
//! **Dependency rule**: this layer may depend on `application`, `domain`, and
//! `led_core`, but MUST NOT be imported by them.

pub mod gpio;
pub mod storage;
pub mod uplink;
pub mod ws_channel;
pub mod ws_server;

// Re-export the primary entry points so `main.rs` can call them concisely.
pub use gpio::build_controller;
pub use storage::load_config;
pub use uplink::{wait_for_uplink, DEFAULT_PROBE_INTERVAL};
pub use ws_server::{run_server, serve};
