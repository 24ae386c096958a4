//! Text protocol parser for link datagrams.
//!
//! Commands (controller to maze):
//! - `"<dr>,<dc>"` - step, each component in `-1..=1`, at most one non-zero
//! - `"reset"` - reset
//!
//! Statuses (maze to controller):
//! - `"ok"`, `"goal"`, `"reset_ok"`, `"wall,<dr>,<dc>"`
//! - anything else is kept as [`Status::Unknown`]

use crate::types::{Command, MoveVector, Status, MAX_PAYLOAD_LEN};

/// Error type for datagram decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Nothing left after stripping the line ending.
    Empty,
    /// Payload longer than [`MAX_PAYLOAD_LEN`].
    TooLong,
    /// Payload is not UTF-8 text.
    Encoding,
    /// Text does not have a known command shape.
    Format,
    /// Step vector is diagonal or has a component outside `-1..=1`.
    Vector,
}

impl core::fmt::Display for ParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Empty => write!(f, "empty payload"),
            Self::TooLong => write!(f, "payload too long"),
            Self::Encoding => write!(f, "payload is not utf-8"),
            Self::Format => write!(f, "unknown command format"),
            Self::Vector => write!(f, "invalid move vector"),
        }
    }
}

/// Parse a datagram received by the maze node.
///
/// # Example
///
/// ```
/// use invisyrinth_proto::{parse_command, Command, MoveVector};
///
/// assert_eq!(parse_command(b"-1,0"), Ok(Command::Step(MoveVector::UP)));
/// assert_eq!(parse_command(b"reset"), Ok(Command::Reset));
/// assert!(parse_command(b"foo").is_err());
/// ```
pub fn parse_command(payload: &[u8]) -> Result<Command, ParseError> {
    let text = payload_text(payload)?;

    if text == "reset" {
        return Ok(Command::Reset);
    }

    let (dr, dc) = text.split_once(',').ok_or(ParseError::Format)?;
    parse_vector(dr, dc).map(Command::Step)
}

/// Parse a datagram received by the controller node.
///
/// Only empty, oversized or non-UTF-8 payloads are errors; any other text
/// that is not a known status becomes [`Status::Unknown`].
///
/// # Example
///
/// ```
/// use invisyrinth_proto::{parse_status, MoveVector, Status};
///
/// assert_eq!(parse_status(b"wall,0,1"), Ok(Status::Wall(MoveVector::RIGHT)));
/// assert_eq!(parse_status(b"ok"), Ok(Status::Ok));
/// assert_eq!(parse_status(b"hello"), Ok(Status::unknown("hello")));
/// ```
pub fn parse_status(payload: &[u8]) -> Result<Status, ParseError> {
    let text = payload_text(payload)?;

    Ok(match text {
        "ok" => Status::Ok,
        "goal" => Status::Goal,
        "reset_ok" => Status::ResetOk,
        _ => match parse_wall(text) {
            Some(vector) => Status::Wall(vector),
            None => Status::unknown(text),
        },
    })
}

/// `wall,<dr>,<dc>` with exactly three fields.
fn parse_wall(text: &str) -> Option<MoveVector> {
    let rest = text.strip_prefix("wall,")?;
    let (dr, dc) = rest.split_once(',')?;
    parse_vector(dr, dc).ok()
}

fn parse_vector(dr: &str, dc: &str) -> Result<MoveVector, ParseError> {
    let dr = parse_component(dr)?;
    let dc = parse_component(dc)?;
    MoveVector::new(dr, dc).ok_or(ParseError::Vector)
}

/// Parse a decimal component, tolerating surrounding spaces and a sign.
#[inline]
fn parse_component(s: &str) -> Result<i8, ParseError> {
    s.trim_matches(' ').parse::<i8>().map_err(|_| ParseError::Format)
}

/// Validate length and encoding, returning the text without line ending.
fn payload_text(payload: &[u8]) -> Result<&str, ParseError> {
    if payload.len() > MAX_PAYLOAD_LEN {
        return Err(ParseError::TooLong);
    }

    let line = strip_line_ending(payload);
    if line.is_empty() {
        return Err(ParseError::Empty);
    }

    core::str::from_utf8(line).map_err(|_| ParseError::Encoding)
}

/// Strip trailing CR and/or LF.
#[inline]
pub(crate) fn strip_line_ending(line: &[u8]) -> &[u8] {
    let mut end = line.len();
    if end > 0 && line[end - 1] == b'\n' {
        end -= 1;
    }
    if end > 0 && line[end - 1] == b'\r' {
        end -= 1;
    }
    &line[..end]
}
