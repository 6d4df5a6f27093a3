//! # led-core
//!
//! Shared library for LED-Over-IP containing the command vocabulary, the pure
//! dispatch logic, and the session channel contract.
//!
//! This crate is used by the server binary and by anything that needs to speak
//! or test the protocol. It has zero dependencies on OS APIs, network sockets,
//! or GPIO hardware.
//!
//! # Architecture overview (for beginners)
//!
//! LED-Over-IP exposes one digital output line (an LED, a relay coil, anything
//! that is either on or off) to exactly one remote client at a time over a
//! persistent WebSocket connection. The client sends short text commands and
//! the server answers with short text replies:
//!
//! ```text
//!   client ── "ON"     ──▶ server    server ── "LED on"  ──▶ client
//!   client ── "STATUS" ──▶ server    server ── "LED off" ──▶ client
//! ```
//!
//! This crate (`led-core`) is the shared foundation. It defines:
//!
//! - **`protocol`** – The three-word command vocabulary (`ON`, `OFF`,
//!   `STATUS`), the pure dispatch function that maps (current state, inbound
//!   text) to (next state, reply), and the `SessionChannel` trait that
//!   message-framed transports implement.
//!
//! - **`domain`** – Pure business state with no I/O: the [`OutputState`] flag
//!   that is the single source of truth for what the output line is supposed
//!   to be doing.

// Declare the two top-level modules. Rust will look for each in a
// subdirectory with the same name (e.g., src/protocol/mod.rs).
pub mod domain;
pub mod protocol;

// Re-export the most-used types at the crate root so callers can write
// `led_core::OutputState` instead of `led_core::domain::output::OutputState`.
pub use domain::output::OutputState;
pub use protocol::channel::{ChannelError, InboundPoll, SessionChannel};
pub use protocol::command::Command;
pub use protocol::dispatch::{dispatch, DispatchOutcome};
