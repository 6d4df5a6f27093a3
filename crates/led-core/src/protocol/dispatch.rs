//! The pure dispatch step: (current state, inbound text) → (next state, reply).
//!
//! Dispatch has no side effects. It never touches hardware, never writes to
//! the network, and never logs; it only computes what the new [`OutputState`]
//! should be and what (if anything) to send back. Applying the new state to a
//! physical pin and writing the reply on the wire are the session loop's job,
//! which keeps this function trivially testable.
//!
//! Full behaviour table:
//!
//! | Current state | Input (normalised) | Next state | Outcome |
//! |---------------|--------------------|------------|---------|
//! | Disengaged | `ON` | Engaged | `StateChanged("LED on")` |
//! | Engaged | `ON` | Engaged | `NoReply` (idempotent repeat) |
//! | Engaged | `OFF` | Disengaged | `StateChanged("LED off")` |
//! | Disengaged | `OFF` | Disengaged | `NoReply` (idempotent repeat) |
//! | any | `STATUS` | unchanged | `StatusReported(current text)` |
//! | any | empty | unchanged | `NoReply` (silently ignored) |
//! | any | anything else | unchanged | `Rejected(error text)` |
//!
//! Repeated identical commands are deliberately absorbed rather than
//! re-confirmed: a client that sends `ON` twice gets exactly one `LED on`.

use crate::domain::output::OutputState;
use crate::protocol::command::Command;

/// Outcome of dispatching one inbound message.
///
/// Ephemeral, produced and consumed within a single iteration of the session
/// loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The output state flipped; the reply confirms the new state.
    StateChanged {
        /// Confirmation text, identical to the new state's status text.
        reply: &'static str,
    },
    /// A `STATUS` query was answered; the state did not change.
    StatusReported {
        /// The current state's status text.
        reply: &'static str,
    },
    /// Non-empty text outside the vocabulary; the state did not change.
    Rejected {
        /// Error text echoing the normalised input and naming the vocabulary.
        reply: String,
    },
    /// Nothing to send back: empty input or an idempotent repeat.
    NoReply,
}

impl DispatchOutcome {
    /// The text to write back to the client, if any.
    pub fn reply(&self) -> Option<&str> {
        match self {
            DispatchOutcome::StateChanged { reply } => Some(reply),
            DispatchOutcome::StatusReported { reply } => Some(reply),
            DispatchOutcome::Rejected { reply } => Some(reply),
            DispatchOutcome::NoReply => None,
        }
    }

    /// `true` when the outcome was a rejection of unrecognised input.
    pub fn is_rejection(&self) -> bool {
        matches!(self, DispatchOutcome::Rejected { .. })
    }
}

/// Maps one inbound text message onto the current output state.
///
/// Returns the state the output should now be in together with the
/// [`DispatchOutcome`]. The returned state is equal to `current` for
/// everything except an effective `ON`/`OFF`; callers only need to touch
/// hardware when the two differ.
pub fn dispatch(current: OutputState, raw: &str) -> (OutputState, DispatchOutcome) {
    let Some(command) = Command::parse(raw) else {
        // Empty after trimming: not a command, not an error. Stay silent.
        return (current, DispatchOutcome::NoReply);
    };

    match command {
        Command::Engage if current.is_engaged() => (current, DispatchOutcome::NoReply),
        Command::Engage => {
            let next = OutputState::Engaged;
            (
                next,
                DispatchOutcome::StateChanged {
                    reply: next.status_text(),
                },
            )
        }
        Command::Disengage if !current.is_engaged() => (current, DispatchOutcome::NoReply),
        Command::Disengage => {
            let next = OutputState::Disengaged;
            (
                next,
                DispatchOutcome::StateChanged {
                    reply: next.status_text(),
                },
            )
        }
        Command::QueryStatus => (
            current,
            DispatchOutcome::StatusReported {
                reply: current.status_text(),
            },
        ),
        Command::Invalid(text) => (
            current,
            DispatchOutcome::Rejected {
                reply: rejection_text(&text),
            },
        ),
    }
}

/// Builds the rejection reply for unrecognised input.
///
/// The text echoes the normalised input so the client can see exactly what
/// the server matched against, and names the three valid commands.
fn rejection_text(normalized: &str) -> String {
    format!("invalid command '{normalized}': use ON, OFF or STATUS")
}
