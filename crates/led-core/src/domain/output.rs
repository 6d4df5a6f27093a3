//! Logical state of the controlled output line.
//!
//! The whole system is built around this one flag. It is initialised to
//! [`OutputState::Disengaged`] at process start, mutated only by the dispatch
//! step of the single admitted session, and queried by the `STATUS` command.
//! Applying the flag to real hardware is an infrastructure concern; this type
//! never touches a pin.

/// Logical value of the digital output line.
///
/// The state is the single source of truth for `STATUS` replies: the fixed
/// human-readable strings returned by [`OutputState::status_text`] are the
/// exact texts sent over the wire, both as status reports and as
/// confirmations after a state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputState {
    /// The line is driven high (LED lit, relay closed).
    Engaged,
    /// The line is driven low. This is the state at process start.
    #[default]
    Disengaged,
}

impl OutputState {
    /// Returns `true` when the line is engaged.
    pub fn is_engaged(self) -> bool {
        matches!(self, OutputState::Engaged)
    }

    /// Builds a state from the raw boolean handed to hardware drivers.
    pub fn from_engaged(engaged: bool) -> Self {
        if engaged {
            OutputState::Engaged
        } else {
            OutputState::Disengaged
        }
    }

    /// The fixed wire text describing this state.
    pub fn status_text(self) -> &'static str {
        match self {
            OutputState::Engaged => "LED on",
            OutputState::Disengaged => "LED off",
        }
    }
}
