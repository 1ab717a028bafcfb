// HealthBand - Peripheral Bus
//
// Brings the display and the motion sensor online over the shared I2C bus,
// exactly once at boot. Either one missing is fatal: the caller receives a
// `BootError` and must not enter the monitor loop.
//
// Boot sequence:
//   1. SSD1306 init at 0x3C (128x64).
//   2. MPU6050 WHO_AM_I check + configuration at 0x68. If this fails the
//      (already working) display shows a fault message.
//   3. "System Ready" splash for `BOOT_SPLASH_MS`.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use crate::config::*;
use crate::drivers::display::OledDisplay;
use crate::drivers::imu::Mpu6050;
use crate::error::BootError;
use crate::ui::{self, Frame};

pub const SPLASH_TEXT: &str = "System Ready";
pub const IMU_FAULT_TEXT: &str = "MPU6050 NOT FOUND";

/// Peripherals that passed bring-up.
pub struct Peripherals<I> {
    pub display: OledDisplay<I>,
    pub imu: Mpu6050<I>,
}

/// Bring up both peripherals. `display_bus` and `imu_bus` are two handles
/// onto the same physical bus.
pub fn initialize<I, D>(display_bus: I, imu_bus: I, delay: &mut D) -> Result<Peripherals<I>, BootError>
where
    I: I2c,
    D: DelayNs,
{
    // ---- Display ----------------------------------------------------------
    let mut display = OledDisplay::new(display_bus);
    if let Err(source) = display.init() {
        let err = BootError::DisplayNotFound { address: display.address(), source };
        log::error!("{}", err);
        return Err(err);
    }

    // ---- Motion sensor ----------------------------------------------------
    let mut imu = Mpu6050::new(imu_bus);
    if let Err(source) = imu.probe().and_then(|()| imu.init()) {
        let err = BootError::MotionSensorNotFound { address: imu.address(), source };
        log::error!("{}", err);
        if let Err(e) = ui::present(&Frame::message(IMU_FAULT_TEXT), &mut display) {
            log::warn!("Could not show fault screen: {}", e);
        }
        return Err(err);
    }

    // ---- Splash -----------------------------------------------------------
    if let Err(e) = ui::present(&Frame::message(SPLASH_TEXT), &mut display) {
        log::warn!("Splash screen failed: {}", e);
    }
    delay.delay_ms(BOOT_SPLASH_MS);

    log::info!("Boot complete: display 0x{:02X}, IMU 0x{:02X}", display.address(), imu.address());
    Ok(Peripherals { display, imu })
}
