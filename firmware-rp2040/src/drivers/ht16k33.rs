//! HT16K33 LED controller driving an 8x8 matrix.

use embedded_hal::i2c::I2c;
use invisyrinth_core::{OutputError, PixelMatrix};

pub const DEFAULT_ADDRESS: u8 = 0x70;

const SIZE: usize = 8;

const SYSTEM_SETUP: u8 = 0x20;
const OSCILLATOR_ON: u8 = 0x01;
const DISPLAY_SETUP: u8 = 0x80;
const DISPLAY_ON: u8 = 0x01;
const DIMMING_SET: u8 = 0xE0;
const MAX_BRIGHTNESS: u8 = 0x0F;

/// 8x8 matrix with a back buffer; [`PixelMatrix::present`] writes all rows.
///
/// With `mirrored` set, columns are flipped so a panel mounted upside down
/// reads correctly.
pub struct Ht16k33Matrix<I> {
    i2c: I,
    address: u8,
    mirrored: bool,
    rows: [u8; SIZE],
}

impl<I: I2c> Ht16k33Matrix<I> {
    #[must_use]
    pub fn new(i2c: I, address: u8, mirrored: bool) -> Self {
        Self {
            i2c,
            address,
            mirrored,
            rows: [0; SIZE],
        }
    }

    /// Start the oscillator, blank the panel and switch it on.
    pub fn init(&mut self, brightness: u8) -> Result<(), OutputError> {
        self.write(&[SYSTEM_SETUP | OSCILLATOR_ON])?;
        self.set_brightness(brightness)?;
        self.rows = [0; SIZE];
        self.present()?;
        self.write(&[DISPLAY_SETUP | DISPLAY_ON])
    }

    /// 0 (dimmest) to 15; larger values are clamped.
    pub fn set_brightness(&mut self, level: u8) -> Result<(), OutputError> {
        self.write(&[DIMMING_SET | level.min(MAX_BRIGHTNESS)])
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), OutputError> {
        self.i2c
            .write(self.address, bytes)
            .map_err(|_| OutputError::Io)
    }
}

impl<I: I2c> PixelMatrix for Ht16k33Matrix<I> {
    fn clear(&mut self) -> Result<(), OutputError> {
        self.rows = [0; SIZE];
        Ok(())
    }

    fn set_pixel(&mut self, x: usize, y: usize, on: bool) -> Result<(), OutputError> {
        // Off-panel pixels are ignored.
        if x >= SIZE || y >= SIZE {
            return Ok(());
        }
        let column = if self.mirrored { SIZE - 1 - x } else { x };
        let mask = 1u8 << column;
        if on {
            self.rows[y] |= mask;
        } else {
            self.rows[y] &= !mask;
        }
        Ok(())
    }

    fn present(&mut self) -> Result<(), OutputError> {
        // Display RAM starts at 0x00; each row takes two bytes, the second
        // unused on an 8x8 panel.
        let mut frame = [0u8; 1 + 2 * SIZE];
        for (row, bits) in self.rows.iter().enumerate() {
            frame[1 + 2 * row] = *bits;
        }
        self.write(&frame)
    }
}
