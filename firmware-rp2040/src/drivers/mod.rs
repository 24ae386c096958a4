//! Device drivers implementing the game's input and output traits.
//!
//! All I2C drivers are generic over [`embedded_hal::i2c::I2c`] so several of
//! them can share one bus through `embassy_embedded_hal::shared_bus`.

pub mod buttons;
pub mod ht16k33;
pub mod lcd;
pub mod leds;
pub mod lsm6dsox;

pub use buttons::GpioButtons;
pub use ht16k33::Ht16k33Matrix;
pub use lcd::GroveLcd;
pub use leds::GpioIndicators;
pub use lsm6dsox::Lsm6dsox;
