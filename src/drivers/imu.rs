// HealthBand - MPU6050 IMU Driver
//
// Custom register-level driver over the shared I2C bus. Only the
// accelerometer is used; gyro and temperature registers are never read.

use embedded_hal::i2c::I2c;

use crate::config::*;
use crate::error::BusError;
use crate::sensors::MotionSensor;
use crate::types::Acceleration;

// MPU6050 register addresses
const REG_PWR_MGMT_1: u8 = 0x6B;
const REG_CONFIG: u8 = 0x1A;
const REG_ACCEL_CONFIG: u8 = 0x1C;
const REG_ACCEL_XOUT_H: u8 = 0x3B; // Start of the 6-byte accel burst
const REG_WHO_AM_I: u8 = 0x75;
const WHO_AM_I_EXPECTED: u8 = 0x68;

pub struct Mpu6050<I> {
    bus: I,
    address: u8,
}

impl<I: I2c> Mpu6050<I> {
    pub fn new(bus: I) -> Self {
        Self { bus, address: I2C_ADDR_MPU6050 }
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    /// Verify the device is reachable and identifies as an MPU6050.
    pub fn probe(&mut self) -> Result<(), BusError> {
        let mut buf = [0u8; 1];
        self.bus
            .write_read(self.address, &[REG_WHO_AM_I], &mut buf)
            .map_err(BusError::i2c)?;
        if buf[0] != WHO_AM_I_EXPECTED {
            return Err(BusError::UnexpectedDevice {
                expected: WHO_AM_I_EXPECTED,
                found: buf[0],
            });
        }
        Ok(())
    }

    /// Wake the sensor and configure accel (±8 g), DLPF 21 Hz.
    pub fn init(&mut self) -> Result<(), BusError> {
        // Wake up (clear SLEEP bit)
        self.write_reg(REG_PWR_MGMT_1, 0x00)?;

        // DLPF bandwidth 21 Hz
        self.write_reg(REG_CONFIG, 0x04)?;

        // Accelerometer: ±8 g
        self.write_reg(REG_ACCEL_CONFIG, 0x10)?;

        log::info!("MPU6050 initialised (±8g, DLPF 21Hz)");
        Ok(())
    }

    /// Burst-read the three accelerometer axes and convert to m/s².
    pub fn read_accel(&mut self) -> Result<Acceleration, BusError> {
        let mut raw = [0u8; 6];
        self.bus
            .write_read(self.address, &[REG_ACCEL_XOUT_H], &mut raw)
            .map_err(BusError::i2c)?;

        let axis = |hi: u8, lo: u8| {
            i16::from_be_bytes([hi, lo]) as f32 / ACCEL_SCALE_8G * STANDARD_GRAVITY
        };
        Ok(Acceleration {
            x: axis(raw[0], raw[1]),
            y: axis(raw[2], raw[3]),
            z: axis(raw[4], raw[5]),
        })
    }

    fn write_reg(&mut self, reg: u8, value: u8) -> Result<(), BusError> {
        self.bus
            .write(self.address, &[reg, value])
            .map_err(BusError::i2c)
    }
}

impl<I: I2c> MotionSensor for Mpu6050<I> {
    fn acceleration(&mut self) -> Result<Acceleration, BusError> {
        self.read_accel()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeI2c;
    use embedded_hal::i2c::{ErrorKind, NoAcknowledgeSource};

    #[test]
    fn test_probe_accepts_mpu6050() {
        let bus = FakeI2c::with_devices();
        let mut imu = Mpu6050::new(bus);
        assert_eq!(imu.probe(), Ok(()));
    }

    #[test]
    fn test_probe_rejects_wrong_chip() {
        let bus = FakeI2c::with_devices();
        bus.set_register(I2C_ADDR_MPU6050, REG_WHO_AM_I, &[0x70]);
        let mut imu = Mpu6050::new(bus);
        assert_eq!(
            imu.probe(),
            Err(BusError::UnexpectedDevice { expected: 0x68, found: 0x70 })
        );
    }

    #[test]
    fn test_probe_missing_device() {
        let bus = FakeI2c::with_devices();
        bus.remove_device(I2C_ADDR_MPU6050);
        let mut imu = Mpu6050::new(bus);
        assert_eq!(
            imu.probe(),
            Err(BusError::I2c(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address)))
        );
    }

    #[test]
    fn test_init_writes_range_and_filter() {
        let bus = FakeI2c::with_devices();
        let mut imu = Mpu6050::new(bus.clone());
        imu.init().unwrap();
        assert_eq!(
            bus.writes_to(I2C_ADDR_MPU6050),
            vec![vec![0x6B, 0x00], vec![0x1A, 0x04], vec![0x1C, 0x10]]
        );
    }

    #[test]
    fn test_read_accel_converts_to_ms2() {
        let bus = FakeI2c::with_devices();
        // +1 g on Z (4096 counts), -0.5 g on X
        let x = (-2048i16).to_be_bytes();
        let z = 4096i16.to_be_bytes();
        bus.set_register(I2C_ADDR_MPU6050, REG_ACCEL_XOUT_H, &[x[0], x[1], 0, 0, z[0], z[1]]);

        let mut imu = Mpu6050::new(bus);
        let a = imu.read_accel().unwrap();
        assert!((a.x + STANDARD_GRAVITY / 2.0).abs() < 1e-4);
        assert_eq!(a.y, 0.0);
        assert!((a.z - STANDARD_GRAVITY).abs() < 1e-4);
    }
}
