//! Input source traits: accelerometer, buttons, and the monotonic clock.

use crate::motion::SensorSample;

/// Error type for sensor reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    /// I2C/communication I/O error.
    Io,
    /// No fresh sample available yet.
    NotReady,
}

/// Source of accelerometer samples, polled once per tick.
pub trait AccelerometerSource {
    /// Read the current acceleration in g.
    fn sample(&mut self) -> Result<SensorSample, SensorError>;
}

/// Raw levels of the two buttons. Active-low: `true` means released.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonLevels {
    pub red: bool,
    pub blue: bool,
}

impl ButtonLevels {
    pub const RELEASED: Self = Self {
        red: true,
        blue: true,
    };
}

impl Default for ButtonLevels {
    fn default() -> Self {
        Self::RELEASED
    }
}

/// The red (reset) and blue (pause/resume) buttons.
pub trait Buttons {
    /// Read both levels; called exactly once per tick.
    fn read(&mut self) -> ButtonLevels;
}

/// Falling-edge detector for an active-low input.
///
/// Reports a press only on the high-to-low transition, so holding a button
/// down triggers once.
#[derive(Debug, Clone, Copy)]
pub struct EdgeDetector {
    previous: bool,
}

impl EdgeDetector {
    /// Starts as released (pulled up).
    #[must_use]
    pub const fn new() -> Self {
        Self { previous: true }
    }

    /// Feed the current level; true if the button was pressed just now.
    pub fn pressed(&mut self, level: bool) -> bool {
        let fell = self.previous && !level;
        self.previous = level;
        fell
    }
}

impl Default for EdgeDetector {
    fn default() -> Self {
        Self::new()
    }
}

/// Monotonic millisecond clock.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_on_press_only() {
        let mut edge = EdgeDetector::new();
        assert!(!edge.pressed(true));
        assert!(edge.pressed(false));
        assert!(!edge.pressed(false));
        assert!(!edge.pressed(false));
        assert!(!edge.pressed(true));
        assert!(edge.pressed(false));
    }

    #[test]
    fn test_held_at_boot_is_a_press() {
        let mut edge = EdgeDetector::new();
        assert!(edge.pressed(false));
    }

    #[test]
    fn test_release_is_not_a_press() {
        let mut edge = EdgeDetector::new();
        edge.pressed(false);
        assert!(!edge.pressed(true));
    }
}
