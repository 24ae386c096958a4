//! LSM6DSOX IMU, accelerometer only.

use defmt::warn;
use embedded_hal::i2c::I2c;
use invisyrinth_core::{AccelerometerSource, SensorError, SensorSample};

pub const DEFAULT_ADDRESS: u8 = 0x6A;

const WHO_AM_I: u8 = 0x0F;
const WHO_AM_I_VALUE: u8 = 0x6C;
const CTRL1_XL: u8 = 0x10;
const CTRL3_C: u8 = 0x12;
const STATUS_REG: u8 = 0x1E;
const OUTX_L_A: u8 = 0x28;

/// 104 Hz output data rate, +-2 g full scale.
const CTRL1_XL_104HZ_2G: u8 = 0x40;
/// Block data update, register address auto-increment.
const CTRL3_C_BDU_IF_INC: u8 = 0x44;
const STATUS_XLDA: u8 = 0x01;

/// g per LSB at +-2 g (0.061 mg/LSB).
const SENSITIVITY_G: f32 = 0.000_061;

pub struct Lsm6dsox<I> {
    i2c: I,
    address: u8,
}

impl<I: I2c> Lsm6dsox<I> {
    #[must_use]
    pub fn new(i2c: I, address: u8) -> Self {
        Self { i2c, address }
    }

    /// Check the chip id and start the accelerometer.
    pub fn init(&mut self) -> Result<(), SensorError> {
        let id = self.read_register(WHO_AM_I)?;
        if id != WHO_AM_I_VALUE {
            warn!("Unexpected LSM6DSOX id: {=u8:#x}", id);
            return Err(SensorError::NotReady);
        }
        self.write_register(CTRL3_C, CTRL3_C_BDU_IF_INC)?;
        self.write_register(CTRL1_XL, CTRL1_XL_104HZ_2G)
    }

    fn read_register(&mut self, register: u8) -> Result<u8, SensorError> {
        let mut value = [0u8; 1];
        self.i2c
            .write_read(self.address, &[register], &mut value)
            .map_err(|_| SensorError::Io)?;
        Ok(value[0])
    }

    fn write_register(&mut self, register: u8, value: u8) -> Result<(), SensorError> {
        self.i2c
            .write(self.address, &[register, value])
            .map_err(|_| SensorError::Io)
    }
}

impl<I: I2c> AccelerometerSource for Lsm6dsox<I> {
    fn sample(&mut self) -> Result<SensorSample, SensorError> {
        if self.read_register(STATUS_REG)? & STATUS_XLDA == 0 {
            return Err(SensorError::NotReady);
        }

        let mut raw = [0u8; 6];
        self.i2c
            .write_read(self.address, &[OUTX_L_A], &mut raw)
            .map_err(|_| SensorError::Io)?;

        let axis = |lo: usize| f32::from(i16::from_le_bytes([raw[lo], raw[lo + 1]])) * SENSITIVITY_G;
        Ok(SensorSample::new(axis(0), axis(2), axis(4)))
    }
}
