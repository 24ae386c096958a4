//! Per-node sessions: the state each node's loop owns, and its tick.

pub mod controller;
pub mod maze;

use crate::link::LinkError;
use invisyrinth_proto::ParseError;

pub use controller::{ControllerSession, GameMode, MotionOutcome};
pub use maze::MazeSession;

/// Error type for session operations. None of them stop the loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SessionError {
    /// The datagram did not decode; it was dropped without a reply.
    Decode(ParseError),
    /// A reply could not be sent.
    Link(LinkError),
}

impl From<ParseError> for SessionError {
    fn from(err: ParseError) -> Self {
        SessionError::Decode(err)
    }
}

impl From<LinkError> for SessionError {
    fn from(err: LinkError) -> Self {
        SessionError::Link(err)
    }
}
