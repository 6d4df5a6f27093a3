//! Protocol module containing the command vocabulary, the dispatch logic,
//! and the transport-facing session channel contract.

pub mod channel;
pub mod command;
pub mod dispatch;

pub use channel::{ChannelError, InboundPoll, SessionChannel};
pub use command::Command;
pub use dispatch::{dispatch, DispatchOutcome};
