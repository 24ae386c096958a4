//! Four direction LEDs on GPIO outputs.

use defmt::warn;
use embedded_hal::digital::{OutputPin, PinState};
use invisyrinth_core::{Direction, DirectionalIndicators};

/// One output per direction, in [`Direction::ALL`] order (up, down, left, right).
pub struct GpioIndicators<P> {
    pins: [P; 4],
}

impl<P: OutputPin> GpioIndicators<P> {
    #[must_use]
    pub fn new(up: P, down: P, left: P, right: P) -> Self {
        Self {
            pins: [up, down, left, right],
        }
    }
}

impl<P: OutputPin> DirectionalIndicators for GpioIndicators<P> {
    fn set(&mut self, direction: Direction, on: bool) {
        let pin = match direction {
            Direction::Up => &mut self.pins[0],
            Direction::Down => &mut self.pins[1],
            Direction::Left => &mut self.pins[2],
            Direction::Right => &mut self.pins[3],
        };
        if pin.set_state(PinState::from(on)).is_err() {
            warn!("LED {:?} write failed", direction);
        }
    }
}
