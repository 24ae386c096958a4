//! Wire-level types: MoveVector, Direction, PeerAddress, Command, Status.

use heapless::String;

/// Largest payload carried by a single datagram (ESP-NOW frame limit).
pub const MAX_PAYLOAD_LEN: usize = 250;

/// How much of an unrecognised status text is kept.
pub const MAX_STATUS_TEXT_LEN: usize = 64;

/// A single move on the grid: one row, one column, or nothing at all.
///
/// At most one axis is non-zero and each component is in `-1..=1`.
/// [`MoveVector::NONE`] means "no clear direction".
///
/// ```
/// use invisyrinth_proto::MoveVector;
///
/// assert_eq!(MoveVector::new(-1, 0), Some(MoveVector::UP));
/// assert_eq!(MoveVector::new(1, 1), None);
/// ```
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MoveVector {
    dr: i8,
    dc: i8,
}

impl MoveVector {
    pub const UP: Self = Self { dr: -1, dc: 0 };
    pub const DOWN: Self = Self { dr: 1, dc: 0 };
    pub const LEFT: Self = Self { dr: 0, dc: -1 };
    pub const RIGHT: Self = Self { dr: 0, dc: 1 };

    /// No clear direction.
    pub const NONE: Self = Self { dr: 0, dc: 0 };

    /// Build a vector from row and column deltas.
    ///
    /// Returns `None` for diagonals or components outside `-1..=1`.
    #[must_use]
    pub const fn new(dr: i8, dc: i8) -> Option<Self> {
        if dr < -1 || dr > 1 || dc < -1 || dc > 1 {
            return None;
        }
        if dr != 0 && dc != 0 {
            return None;
        }
        Some(Self { dr, dc })
    }

    /// Row delta.
    #[inline]
    #[must_use]
    pub const fn dr(self) -> i8 {
        self.dr
    }

    /// Column delta.
    #[inline]
    #[must_use]
    pub const fn dc(self) -> i8 {
        self.dc
    }

    /// True for the degenerate (0, 0) vector.
    #[inline]
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.dr == 0 && self.dc == 0
    }

    /// The compass direction this vector points to, if any.
    #[must_use]
    pub const fn direction(self) -> Option<Direction> {
        match (self.dr, self.dc) {
            (-1, 0) => Some(Direction::Up),
            (1, 0) => Some(Direction::Down),
            (0, -1) => Some(Direction::Left),
            (0, 1) => Some(Direction::Right),
            _ => None,
        }
    }
}

impl From<Direction> for MoveVector {
    fn from(direction: Direction) -> Self {
        direction.vector()
    }
}

/// One of the four move directions.
///
/// "Up" is row -1 (forward tilt), "Left" is column -1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    #[must_use]
    pub const fn vector(self) -> MoveVector {
        match self {
            Direction::Up => MoveVector::UP,
            Direction::Down => MoveVector::DOWN,
            Direction::Left => MoveVector::LEFT,
            Direction::Right => MoveVector::RIGHT,
        }
    }
}

/// 6-byte hardware address identifying a node on the link.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PeerAddress(pub [u8; 6]);

impl PeerAddress {
    /// Address accepted by every node.
    pub const BROADCAST: Self = Self([0xFF; 6]);

    #[must_use]
    pub const fn new(octets: [u8; 6]) -> Self {
        Self(octets)
    }

    #[inline]
    #[must_use]
    pub const fn octets(&self) -> [u8; 6] {
        self.0
    }
}

impl core::fmt::Display for PeerAddress {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02x}:{b:02x}:{c:02x}:{d:02x}:{e:02x}:{g:02x}")
    }
}

/// Intent sent from the controller to the maze.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[must_use]
pub enum Command {
    /// Move the player by the given vector (wire: `"<dr>,<dc>"`).
    Step(MoveVector),
    /// Put the player back on the start cell (wire: `"reset"`).
    Reset,
}

/// Report sent from the maze back to the controller.
#[derive(Clone, Debug, PartialEq, Eq)]
#[must_use]
pub enum Status {
    /// Move applied (wire: `"ok"`).
    Ok,
    /// Move blocked; echoes the attempted vector (wire: `"wall,<dr>,<dc>"`).
    Wall(MoveVector),
    /// Goal cell reached (wire: `"goal"`).
    Goal,
    /// Reset acknowledged (wire: `"reset_ok"`).
    ResetOk,
    /// Anything else, kept verbatim (truncated to [`MAX_STATUS_TEXT_LEN`] bytes).
    Unknown(String<MAX_STATUS_TEXT_LEN>),
}

impl Status {
    /// Wrap arbitrary text as an unknown status, truncating on a char boundary.
    pub fn unknown(text: &str) -> Self {
        let mut kept = String::new();
        for ch in text.chars() {
            if kept.push(ch).is_err() {
                break;
            }
        }
        Status::Unknown(kept)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Status {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Status::Ok => defmt::write!(f, "Ok"),
            Status::Wall(v) => defmt::write!(f, "Wall({})", v),
            Status::Goal => defmt::write!(f, "Goal"),
            Status::ResetOk => defmt::write!(f, "ResetOk"),
            Status::Unknown(text) => defmt::write!(f, "Unknown({=str})", text.as_str()),
        }
    }
}
