//! Board wiring and node identities.
//!
//! # Pins (Raspberry Pi Pico)
//!
//! | Function | GPIO | Node |
//! |----------|------|------|
//! | UART0 TX (radio) | 0 | both |
//! | UART0 RX (radio) | 1 | both |
//! | I2C0 SDA | 4 | both |
//! | I2C0 SCL | 5 | both |
//! | LED up | 10 | controller |
//! | LED down | 11 | controller |
//! | LED left | 12 | controller |
//! | LED right | 13 | controller |
//! | Red button (reset) | 14 | controller |
//! | Blue button (pause) | 15 | controller |
//!
//! Buttons are active-low with the internal pull-ups enabled.

use invisyrinth_core::PeerAddress;

/// Radio address of the handheld controller.
pub const CONTROLLER_ADDRESS: PeerAddress =
    PeerAddress::new([0x74, 0x4d, 0xbd, 0xa1, 0x0a, 0xbc]);

/// Radio address of the maze board.
pub const MAZE_ADDRESS: PeerAddress = PeerAddress::new([0xec, 0xda, 0x3b, 0x55, 0x13, 0xb4]);

/// Baud rate of the radio module's serial port (8N1).
pub const RADIO_BAUDRATE: u32 = 115_200;

/// I2C bus speed shared by the LCD, matrix and accelerometer.
pub const I2C_FREQUENCY: u32 = 100_000;

/// HT16K33 dimming level, 0 (dimmest) to 15.
pub const MATRIX_BRIGHTNESS: u8 = 3;

/// Peers a node may register.
pub const MAX_PEERS: usize = 4;

/// Received datagrams buffered between the radio task and the session.
pub const INBOX_DEPTH: usize = 4;
