//! Domain layer for led-server.
//!
//! The domain layer contains pure business-logic types that have no
//! dependencies on I/O, networking, or hardware. The output state itself
//! lives in `led-core` (it is shared with the protocol logic); what remains
//! here is the configuration that describes one concrete deployment.
//!
//! # What does NOT belong here?
//!
//! - Any `tokio`, `TcpStream`, or `WebSocket` types
//! - GPIO register access
//! - File I/O or environment variable reading

// Declare the sub-modules that make up the domain layer.
pub mod config;

// Re-export the most commonly needed types at the domain module boundary
// so callers can write `domain::ServerConfig` instead of the longer path.
pub use config::{ConfigError, ServerConfig};
