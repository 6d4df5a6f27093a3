//! led-server library crate.
//!
//! This crate provides the LED-Over-IP control endpoint: a WebSocket server
//! that lets exactly one remote client at a time toggle a digital output line
//! and query its state.
//!
//! # Architecture (clean architecture)
//!
//! ```text
//! Client (text commands over WebSocket)
//!         ↕
//! [led-server]
//!   ├── domain/           Pure types: ServerConfig
//!   ├── application/      SessionGate, the session loop, OutputController seam
//!   └── infrastructure/
//!         ├── ws_server/  WebSocket accept loop (tokio-tungstenite)
//!         ├── ws_channel/ SessionChannel implementation over WebSocket frames
//!         ├── gpio/       Output pin drivers (rppal on Linux, mock elsewhere)
//!         ├── uplink/     Startup wait for a usable network route
//!         └── storage/    Optional TOML config file
//! ```
//!
//! # Layer rules
//!
//! - `domain` has no external dependencies (no I/O, no async, no frameworks).
//! - `application` depends on `domain` and `led-core` only.
//! - `infrastructure` depends on all other layers plus `tokio`, `tungstenite`
//!   and (on Linux) `rppal`.
//!
//! # For beginners: why this structure?
//!
//! Clean architecture separates *what the program does* (domain + application)
//! from *how it does it* (infrastructure). The admission gate and the session
//! loop can be unit-tested with scripted in-memory channels and a recording
//! mock pin, without ever opening a socket or touching GPIO registers.

/// Domain layer: pure business-logic types (no I/O).
pub mod domain;

/// Application layer: admission control and the session loop.
pub mod application;

/// Infrastructure layer: WebSocket transport, GPIO drivers, config storage.
pub mod infrastructure;
