//! Application layer for led-server.
//!
//! The application layer orchestrates the business logic: it knows *what* to
//! do, but delegates *how* to do it to the infrastructure layer.
//!
//! # Responsibilities
//!
//! - Enforcing the single-active-client invariant (the [`SessionGate`])
//! - Running the per-session poll/dispatch/reply loop ([`session::run_session`])
//! - Owning the process-scoped shared state ([`ServerState`])
//! - Defining the [`OutputController`] seam that hardware drivers implement
//!
//! # What does NOT belong here?
//!
//! - Opening sockets or listening for connections (that is infrastructure)
//! - WebSocket framing (handled by tokio-tungstenite behind `SessionChannel`)
//! - GPIO register access (behind `OutputController`)

pub mod admission;
pub mod context;
pub mod output;
pub mod session;

// Re-export so callers can write `application::SessionGate` instead of the
// longer module paths.
pub use admission::{SessionGate, SessionPermit};
pub use context::ServerState;
pub use output::{OutputController, OutputError};
pub use session::{run_session, SessionEnd};
