//! Configuration constants for both nodes.
//!
//! All the magic numbers of the game live here: sensing thresholds, loop
//! timing, display geometry, and the maze layout with its start and goal.

use crate::maze::Position;

// Motion sensing
/// Deviation from 1 g that counts as a footstep peak.
pub const STEP_THRESHOLD_G: f32 = 0.05;

/// Refractory window after a detected step.
pub const MIN_STEP_INTERVAL_MS: u64 = 1000;

/// Horizontal deflection needed before a tilt picks a direction.
pub const TILT_THRESHOLD_G: f32 = 0.10;

/// Acceleration magnitude of a device at rest.
pub const RESTING_MAGNITUDE_G: f32 = 1.0;

// Loop timing
/// Idle sleep between scheduler ticks.
pub const IDLE_DELAY_MS: u32 = 50;

/// Settle delay after a button action.
pub const BUTTON_SETTLE_MS: u32 = 300;

/// How long the title is shown at controller startup.
pub const SPLASH_MS: u32 = 3000;

// Display
/// Characters per line on the 2x16 character display.
pub const DISPLAY_COLUMNS: usize = 16;

/// Title shown on the splash screen.
pub const TITLE: &str = "Invisyrinth";

// Maze
pub const GRID_ROWS: usize = 8;
pub const GRID_COLS: usize = 8;

/// Maze layout, row 0 at the top. `#` is a wall, anything else is open.
pub const MAZE_LAYOUT: [&str; GRID_ROWS] = [
    "########",
    "#      #",
    "#####  #",
    "#      #",
    "#   ####",
    "##     #",
    "#      #",
    "# ######",
];

/// Where the player starts and returns to on reset.
pub const START: Position = Position::new(1, 1);

/// The exit in the bottom row.
pub const GOAL: Position = Position::new(7, 1);

/// Motion-sensing thresholds, grouped for injection into detectors.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotionConfig {
    /// Minimum |magnitude - resting| for a step, in g.
    pub step_threshold_g: f32,
    /// Refractory window in milliseconds.
    pub min_step_interval_ms: u64,
    /// Minimum horizontal tilt for a direction, in g.
    pub tilt_threshold_g: f32,
    /// Magnitude of gravity as reported by the sensor at rest.
    pub resting_magnitude_g: f32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            step_threshold_g: STEP_THRESHOLD_G,
            min_step_interval_ms: MIN_STEP_INTERVAL_MS,
            tilt_threshold_g: TILT_THRESHOLD_G,
            resting_magnitude_g: RESTING_MAGNITUDE_G,
        }
    }
}
