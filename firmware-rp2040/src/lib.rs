//! Invisyrinth nodes for RP2040.
//!
//! This crate provides the hardware side of both Invisyrinth boards: the
//! handheld controller and the maze. Game logic lives in
//! [`invisyrinth_core`]; everything here adapts Pico peripherals to its
//! traits.
//!
//! # Overview
//!
//! Each node is its own binary:
//!
//! - **`controller`**: reads the accelerometer and buttons, sends steps,
//!   shows the maze's answers on the LCD and direction LEDs
//! - **`maze`**: owns the maze, applies steps, answers, draws the board on
//!   the LED matrix
//!
//! # Architecture
//!
//! Both binaries run on the Embassy executor with two tasks:
//!
//! - **Radio RX task**: reads frame lines from UART0 and pushes datagrams
//!   into an [`Inbox`](radio::Inbox) channel
//! - **Main task**: runs the node's session loop, polling (controller) or
//!   awaiting (maze) the inbox through [`RadioLink`]
//!
//! # Modules
//!
//! - [`config`]: pin map, radio addresses, tuning
//! - [`drivers`]: LCD, LED matrix, IMU, LEDs, buttons
//! - [`radio`]: serial packet radio [`Link`](invisyrinth_core::Link)
//! - [`time`]: [`EmbassyClock`]
//!
//! # Features
//!
//! - **`dev-panic`** (default): Use `panic-probe` for development (prints panic info via RTT)
//! - **`prod-panic`**: Use `panic-reset` for production (silent watchdog reset)
//!
//! # Re-exports
//!
//! This crate re-exports the session types from [`invisyrinth_core`] for
//! convenience, so the binaries only need to depend on this crate.

#![no_std]

#[cfg(all(feature = "dev-panic", feature = "prod-panic"))]
compile_error!("Cannot enable both `dev-panic` and `prod-panic` features");

// Re-export core types for convenience
pub use invisyrinth_core::{
    ControllerSession, Feedback, Maze, MazeSession, MotionConfig, PeerAddress,
};

pub mod config;
pub mod drivers;
pub mod radio;
pub mod time;

pub use radio::{Inbox, RadioError, RadioLink, RadioReceiver};
pub use time::EmbassyClock;
