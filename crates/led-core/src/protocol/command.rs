//! Parsing of inbound text into the command vocabulary.
//!
//! The protocol understands exactly three words: `ON`, `OFF` and `STATUS`.
//! Matching is case-insensitive and ignores surrounding whitespace, so
//! `" on "`, `"On"` and `"ON"` are the same command. Text that is empty once
//! trimmed is not a command at all; the session silently ignores it and keeps
//! waiting, which lets clients send keep-alive blanks without ever triggering
//! an error reply.

/// A parsed client command.
///
/// `Command` is ephemeral: it exists only between receiving one text message
/// and dispatching it. Unrecognised input is preserved as [`Command::Invalid`]
/// so the rejection reply can echo back exactly what the server understood.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Engage the output line (`ON`).
    Engage,
    /// Disengage the output line (`OFF`).
    Disengage,
    /// Report the current output state (`STATUS`).
    QueryStatus,
    /// Non-empty text outside the vocabulary, carrying the normalised form.
    Invalid(String),
}

impl Command {
    /// Parses one inbound text message.
    ///
    /// Normalisation trims surrounding whitespace and upper-cases the rest
    /// before matching. Returns `None` when nothing remains after trimming;
    /// the caller treats that as "no message worth answering", not as an
    /// invalid command.
    pub fn parse(raw: &str) -> Option<Command> {
        let normalized = raw.trim().to_uppercase();
        if normalized.is_empty() {
            return None;
        }
        Some(match normalized.as_str() {
            "ON" => Command::Engage,
            "OFF" => Command::Disengage,
            "STATUS" => Command::QueryStatus,
            _ => Command::Invalid(normalized),
        })
    }
}
