//! Red and blue push buttons on pulled-up GPIO inputs.

use embedded_hal::digital::InputPin;
use invisyrinth_core::{ButtonLevels, Buttons};

pub struct GpioButtons<P> {
    red: P,
    blue: P,
}

impl<P: InputPin> GpioButtons<P> {
    #[must_use]
    pub fn new(red: P, blue: P) -> Self {
        Self { red, blue }
    }
}

impl<P: InputPin> Buttons for GpioButtons<P> {
    fn read(&mut self) -> ButtonLevels {
        // A failed read counts as released.
        ButtonLevels {
            red: self.red.is_high().unwrap_or(true),
            blue: self.blue.is_high().unwrap_or(true),
        }
    }
}
