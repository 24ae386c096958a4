//! Motion sensing: footstep detection and tilt classification.
//!
//! Both work on single accelerometer samples in units of g. The step detector
//! looks at the total magnitude, the classifier only at the two horizontal axes.

use crate::config::MotionConfig;
use invisyrinth_proto::MoveVector;
use libm::{fabsf, sqrtf};

/// One accelerometer reading in g.
#[derive(Clone, Copy, Default, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorSample {
    pub ax: f32,
    pub ay: f32,
    pub az: f32,
}

impl SensorSample {
    #[must_use]
    pub const fn new(ax: f32, ay: f32, az: f32) -> Self {
        Self { ax, ay, az }
    }

    /// Lying flat and still: gravity on the z axis only.
    pub const RESTING: Self = Self::new(0.0, 0.0, 1.0);

    /// Euclidean norm of the acceleration vector.
    #[inline]
    #[must_use]
    pub fn magnitude(&self) -> f32 {
        sqrtf(self.ax * self.ax + self.ay * self.ay + self.az * self.az)
    }
}

/// Detects footsteps as peaks of the acceleration magnitude away from 1 g.
///
/// After a step is detected, every sample inside the refractory window is
/// rejected outright; nothing is queued for later.
#[derive(Debug, Clone)]
pub struct StepDetector {
    threshold_g: f32,
    min_interval_ms: u64,
    resting_g: f32,
    last_step_ms: u64,
}

impl StepDetector {
    #[must_use]
    pub fn new(config: &MotionConfig) -> Self {
        Self {
            threshold_g: config.step_threshold_g,
            min_interval_ms: config.min_step_interval_ms,
            resting_g: config.resting_magnitude_g,
            last_step_ms: 0,
        }
    }

    /// Feed one sample taken at `now_ms` (monotonic); returns true on a step.
    pub fn detect(&mut self, sample: &SensorSample, now_ms: u64) -> bool {
        if now_ms.saturating_sub(self.last_step_ms) < self.min_interval_ms {
            return false;
        }

        let delta = fabsf(sample.magnitude() - self.resting_g);
        if delta > self.threshold_g {
            self.last_step_ms = now_ms;
            debug!("Step detected, delta = {}", delta);
            return true;
        }

        false
    }

    /// Timestamp of the last accepted step (0 before the first one).
    #[inline]
    #[must_use]
    pub fn last_step_ms(&self) -> u64 {
        self.last_step_ms
    }
}

impl Default for StepDetector {
    fn default() -> Self {
        Self::new(&MotionConfig::default())
    }
}

/// Turns controller tilt into a single-axis move.
///
/// The vertical axis (forward/backward) wins ties with the horizontal one.
#[derive(Debug, Clone, Copy)]
pub struct DirectionClassifier {
    threshold_g: f32,
}

impl DirectionClassifier {
    #[must_use]
    pub fn new(config: &MotionConfig) -> Self {
        Self {
            threshold_g: config.tilt_threshold_g,
        }
    }

    /// Classify a sample; [`MoveVector::NONE`] when the tilt is too slight.
    pub fn classify(&self, sample: &SensorSample) -> MoveVector {
        let abs_x = fabsf(sample.ax);
        let abs_y = fabsf(sample.ay);

        if abs_x.max(abs_y) < self.threshold_g {
            return MoveVector::NONE;
        }

        let vector = if abs_y >= abs_x {
            if sample.ay < 0.0 {
                MoveVector::UP
            } else {
                MoveVector::DOWN
            }
        } else if sample.ax < 0.0 {
            MoveVector::LEFT
        } else {
            MoveVector::RIGHT
        };

        trace!("Tilt direction: {:?}", vector);
        vector
    }
}

impl Default for DirectionClassifier {
    fn default() -> Self {
        Self::new(&MotionConfig::default())
    }
}
