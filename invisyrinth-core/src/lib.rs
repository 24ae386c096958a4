//! Platform-agnostic Invisyrinth game logic.
//!
//! Everything both nodes do that is not hardware lives here, behind small
//! traits so it runs the same on the RP2040 and on the host under test.
//!
//! # Overview
//!
//! - [`motion`]: step detection and tilt classification ([`StepDetector`], [`DirectionClassifier`])
//! - [`maze`]: the authoritative grid and player position ([`Maze`])
//! - [`input`]: accelerometer, button and clock traits
//! - [`output`]: display, indicator and pixel-matrix traits, plus [`Feedback`]
//! - [`link`]: peer-addressed datagram transport ([`Link`])
//! - [`session`]: the per-node loops ([`ControllerSession`], [`MazeSession`])
//! - [`config`]: tunable constants and the built-in maze
//!
//! # Example
//!
//! ```rust
//! use invisyrinth_core::{Maze, MoveVector, Status};
//!
//! let mut maze = Maze::standard();
//! assert!(matches!(maze.apply_step(MoveVector::DOWN), Status::Wall(_)));
//! assert_eq!(maze.apply_step(MoveVector::RIGHT), Status::Ok);
//! maze.reset();
//! assert_eq!(maze.position(), maze.start());
//! ```
//!
//! # Features
//!
//! - **`std`**: Enable standard library support (for host testing)
//! - **`defmt`**: Log through defmt (for embedded targets)
//! - **`log`**: Log through the `log` facade
//!
//! With neither logging feature enabled, log statements compile away.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate std;

// This must come first so the macros are visible to the other modules.
#[macro_use]
mod logging;

pub mod config;
pub mod input;
pub mod link;
pub mod maze;
pub mod motion;
pub mod output;
pub mod session;

#[cfg(test)]
mod mock;

// Re-export main types at crate root
pub use config::MotionConfig;
pub use input::{AccelerometerSource, ButtonLevels, Buttons, Clock, EdgeDetector, SensorError};
pub use link::{Datagram, Link, LinkError, PeerRegistration, PeerTable};
pub use maze::{Cell, GridError, Maze, MazeGrid, Position};
pub use motion::{DirectionClassifier, SensorSample, StepDetector};
pub use output::{
    DirectionalIndicators, Feedback, OutputError, PixelMatrix, Rgb, TextDisplay,
};
pub use session::{ControllerSession, GameMode, MazeSession, MotionOutcome, SessionError};

pub use invisyrinth_proto::{Command, Direction, MoveVector, PeerAddress, Status};
