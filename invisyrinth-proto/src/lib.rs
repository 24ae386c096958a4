//! Wire types, parsing, and serialization for the Invisyrinth link.
//!
//! The controller node and the maze node exchange short ASCII datagrams over
//! a best-effort wireless link. This crate owns everything that crosses it:
//!
//! - **Types**: [`MoveVector`], [`Direction`], [`PeerAddress`], [`Command`], [`Status`]
//! - **Parsing**: [`parse_command()`] on the maze side, [`parse_status()`] on the controller side
//! - **Serialization**: the [`Serialize`] trait
//! - **Framing**: [`frame`] lines for radios attached over a serial port
//!
//! # Protocol Format
//!
//! | Direction | Payload | Meaning |
//! |---|---|---|
//! | controller to maze | `<dr>,<dc>` | step, e.g. `-1,0` |
//! | controller to maze | `reset` | back to the start cell |
//! | maze to controller | `ok` | moved |
//! | maze to controller | `wall,<dr>,<dc>` | blocked, echoes the vector |
//! | maze to controller | `goal` | goal reached |
//! | maze to controller | `reset_ok` | reset acknowledged |
//!
//! There is no checksum, sequence number or acknowledgement: a lost datagram
//! simply never takes effect.
//!
//! # Example
//!
//! ```
//! use invisyrinth_proto::{parse_command, Command, MoveVector, Serialize, Status};
//!
//! let payload = Command::Step(MoveVector::LEFT).to_payload().unwrap();
//! assert_eq!(payload.as_slice(), b"0,-1");
//! assert_eq!(parse_command(&payload), Ok(Command::Step(MoveVector::LEFT)));
//!
//! let mut buf = [0u8; 16];
//! let len = Status::Wall(MoveVector::UP).serialize(&mut buf).unwrap();
//! assert_eq!(&buf[..len], b"wall,-1,0");
//! ```
//!
//! # Features
//!
//! - **`std`**: Enable standard library support (for host testing)
//! - **`defmt`**: Enable defmt formatting (for embedded logging)
//!
//! # No-std Support
//!
//! This crate is `#![no_std]` by default and uses no heap allocations.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate std;

pub mod frame;
pub mod parser;
pub mod serialize;
pub mod types;

// Re-export types at crate root for convenience
pub use parser::{parse_command, parse_status, ParseError};
pub use serialize::{Payload, Serialize, SerializeError};
pub use types::{
    Command, Direction, MoveVector, PeerAddress, Status, MAX_PAYLOAD_LEN, MAX_STATUS_TEXT_LEN,
};
