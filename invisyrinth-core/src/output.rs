//! Feedback sink traits and the status-to-feedback mapping.

use crate::config::DISPLAY_COLUMNS;
use invisyrinth_proto::{Direction, MoveVector, Status};

/// Error type for output operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutputError {
    /// I2C/communication I/O error.
    Io,
    /// Device not initialised.
    NotReady,
}

/// Backlight colour.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const BLUE: Self = Self::new(0, 0, 255);
    pub const RED: Self = Self::new(255, 0, 0);
    pub const GREEN: Self = Self::new(0, 255, 0);
    pub const YELLOW: Self = Self::new(255, 255, 0);
    pub const WHITE: Self = Self::new(255, 255, 255);
}

/// Two-line character display with an RGB backlight.
pub trait TextDisplay {
    /// Blank both lines.
    fn clear(&mut self) -> Result<(), OutputError>;

    /// Set the backlight colour.
    fn set_color(&mut self, color: Rgb) -> Result<(), OutputError>;

    /// Write `line1` on the top row and, if given, `line2` below it.
    ///
    /// Callers pass at most [`DISPLAY_COLUMNS`] characters per line.
    fn show_lines(&mut self, line1: &str, line2: Option<&str>) -> Result<(), OutputError>;
}

/// Four indicator lights, one per direction.
pub trait DirectionalIndicators {
    fn set(&mut self, direction: Direction, on: bool);

    fn all_off(&mut self) {
        for direction in Direction::ALL {
            self.set(direction, false);
        }
    }

    /// Light only the indicator matching `vector`; all off for [`MoveVector::NONE`].
    fn show_direction(&mut self, vector: MoveVector) {
        self.all_off();
        if let Some(direction) = vector.direction() {
            self.set(direction, true);
        }
    }
}

/// Monochrome pixel matrix with a back buffer.
pub trait PixelMatrix {
    /// Clear the back buffer.
    fn clear(&mut self) -> Result<(), OutputError>;

    /// Set one pixel in the back buffer (x = column, y = row).
    fn set_pixel(&mut self, x: usize, y: usize, on: bool) -> Result<(), OutputError>;

    /// Push the back buffer to the hardware.
    fn present(&mut self) -> Result<(), OutputError>;
}

/// First `max_chars` characters of `text`.
#[must_use]
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

/// Controller-side feedback: the character display plus direction lights.
///
/// Display failures are logged with the text that should have been shown
/// and never propagate; the game goes on without the screen.
pub struct Feedback<D, I> {
    display: D,
    indicators: I,
}

impl<D: TextDisplay, I: DirectionalIndicators> Feedback<D, I> {
    pub fn new(display: D, indicators: I) -> Self {
        Self {
            display,
            indicators,
        }
    }

    /// Clear the display and show up to two lines, truncated to the display width.
    pub fn message(&mut self, line1: &str, line2: Option<&str>) {
        let line1 = truncate_chars(line1, DISPLAY_COLUMNS);
        let line2 = line2
            .map(|l| truncate_chars(l, DISPLAY_COLUMNS))
            .filter(|l| !l.is_empty());

        let result = self
            .display
            .clear()
            .and_then(|()| self.display.show_lines(line1, line2));

        if let Err(e) = result {
            error!("LCD error: {:?}", e);
            info!("LCD: {} | {}", line1, line2.unwrap_or(""));
        }
    }

    pub fn color(&mut self, color: Rgb) {
        if let Err(e) = self.display.set_color(color) {
            error!("LCD backlight error: {:?}", e);
        }
    }

    pub fn clear(&mut self) {
        if let Err(e) = self.display.clear() {
            error!("LCD error: {:?}", e);
        }
    }

    pub fn lights_off(&mut self) {
        self.indicators.all_off();
    }

    /// Render a status reported by the maze node.
    pub fn show_status(&mut self, status: &Status) {
        match status {
            Status::ResetOk => {
                self.indicators.all_off();
                self.color(Rgb::BLUE);
                self.message("New run", Some("Good luck!"));
            }
            Status::Wall(vector) => {
                self.color(Rgb::RED);
                self.indicators.show_direction(*vector);
                self.message("Careful,", Some("wall!"));
            }
            Status::Goal => {
                self.indicators.all_off();
                self.color(Rgb::GREEN);
                self.message("Congratulations,", Some("you won!"));
            }
            Status::Ok => {
                self.indicators.all_off();
                self.color(Rgb::YELLOW);
                self.message("Keep going!", None);
            }
            Status::Unknown(text) => {
                self.indicators.all_off();
                self.color(Rgb::WHITE);
                self.message("Unknown status", Some(text.as_str()));
            }
        }
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    pub fn indicators(&self) -> &I {
        &self.indicators
    }
}
