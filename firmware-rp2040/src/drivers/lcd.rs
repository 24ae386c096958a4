//! Grove 16x2 LCD with RGB backlight.
//!
//! Two devices share the module: an AiP31068 character controller
//! (HD44780 command set) at `0x3E` and a PCA9633 LED driver for the
//! backlight at `0x62`.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use invisyrinth_core::{OutputError, Rgb, TextDisplay};

pub const LCD_ADDRESS: u8 = 0x3E;
pub const RGB_ADDRESS: u8 = 0x62;

// Control bytes
const COMMAND: u8 = 0x80;
const DATA: u8 = 0x40;

// AiP31068 commands
const CLEAR_DISPLAY: u8 = 0x01;
const ENTRY_MODE_SET: u8 = 0x04;
const ENTRY_LEFT: u8 = 0x02;
const DISPLAY_CONTROL: u8 = 0x08;
const DISPLAY_ON: u8 = 0x04;
const FUNCTION_SET: u8 = 0x20;
const TWO_LINES: u8 = 0x08;
const SET_DDRAM_ADDRESS: u8 = 0x80;

const LINE_OFFSETS: [u8; 2] = [0x00, 0x40];

// PCA9633 registers
const REG_MODE1: u8 = 0x00;
const REG_MODE2: u8 = 0x01;
const REG_BLUE: u8 = 0x02;
const REG_GREEN: u8 = 0x03;
const REG_RED: u8 = 0x04;
const REG_LEDOUT: u8 = 0x08;

/// Shown for characters the controller's ROM lacks.
const REPLACEMENT: u8 = b'?';

/// Grove RGB LCD driver.
pub struct GroveLcd<I, D> {
    i2c: I,
    delay: D,
}

impl<I: I2c, D: DelayNs> GroveLcd<I, D> {
    #[must_use]
    pub fn new(i2c: I, delay: D) -> Self {
        Self { i2c, delay }
    }

    /// Run the power-on sequence and light the backlight white.
    pub fn init(&mut self) -> Result<(), OutputError> {
        // The controller needs >40 ms after power-up.
        self.delay.delay_ms(50);

        // Function set is repeated, as the HD44780 init sequence requires.
        for _ in 0..3 {
            self.command(FUNCTION_SET | TWO_LINES)?;
            self.delay.delay_us(4500);
        }
        self.command(DISPLAY_CONTROL | DISPLAY_ON)?;
        self.clear()?;
        self.command(ENTRY_MODE_SET | ENTRY_LEFT)?;

        self.set_register(REG_MODE1, 0x00)?;
        // All four outputs under individual PWM control.
        self.set_register(REG_LEDOUT, 0xFF)?;
        self.set_register(REG_MODE2, 0x20)?;
        self.set_color(Rgb::WHITE)
    }

    fn command(&mut self, command: u8) -> Result<(), OutputError> {
        self.i2c
            .write(LCD_ADDRESS, &[COMMAND, command])
            .map_err(|_| OutputError::Io)
    }

    fn set_cursor(&mut self, col: u8, row: usize) -> Result<(), OutputError> {
        let offset = LINE_OFFSETS.get(row).copied().unwrap_or(0);
        self.command(SET_DDRAM_ADDRESS | (offset + col))
    }

    fn write_text(&mut self, text: &str) -> Result<(), OutputError> {
        for c in text.chars() {
            let byte = if c.is_ascii() && !c.is_ascii_control() {
                c as u8
            } else {
                REPLACEMENT
            };
            self.i2c
                .write(LCD_ADDRESS, &[DATA, byte])
                .map_err(|_| OutputError::Io)?;
        }
        Ok(())
    }

    fn set_register(&mut self, register: u8, value: u8) -> Result<(), OutputError> {
        self.i2c
            .write(RGB_ADDRESS, &[register, value])
            .map_err(|_| OutputError::Io)
    }
}

impl<I: I2c, D: DelayNs> TextDisplay for GroveLcd<I, D> {
    fn clear(&mut self) -> Result<(), OutputError> {
        self.command(CLEAR_DISPLAY)?;
        self.delay.delay_ms(2);
        Ok(())
    }

    fn set_color(&mut self, color: Rgb) -> Result<(), OutputError> {
        self.set_register(REG_RED, color.r)?;
        self.set_register(REG_GREEN, color.g)?;
        self.set_register(REG_BLUE, color.b)
    }

    fn show_lines(&mut self, line1: &str, line2: Option<&str>) -> Result<(), OutputError> {
        self.set_cursor(0, 0)?;
        self.write_text(line1)?;
        if let Some(line2) = line2 {
            self.set_cursor(0, 1)?;
            self.write_text(line2)?;
        }
        Ok(())
    }
}
