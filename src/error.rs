// HealthBand - Error Types
//
// Two tiers: `BusError` is a single failed transaction and only costs the
// current cycle; `BootError` means a peripheral never came up and the
// firmware must halt before the loop starts.

use embedded_hal::i2c::ErrorKind;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BusError {
    #[error("I2C transaction failed: {0:?}")]
    I2c(ErrorKind),

    #[error("unexpected device id 0x{found:02X} (expected 0x{expected:02X})")]
    UnexpectedDevice { expected: u8, found: u8 },
}

impl BusError {
    /// Collapse any HAL-specific I2C error into its portable kind.
    pub fn i2c<E: embedded_hal::i2c::Error>(err: E) -> Self {
        Self::I2c(err.kind())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BootError {
    #[error("SSD1306 display not found at 0x{address:02X}: {source}")]
    DisplayNotFound { address: u8, source: BusError },

    #[error("MPU6050 motion sensor not found at 0x{address:02X}: {source}")]
    MotionSensorNotFound { address: u8, source: BusError },
}
