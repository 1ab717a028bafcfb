// HealthBand - Sensor Reader
//
// Wraps the three input sources and captures one `RawSample` per cycle.
// Only the motion read touches the I2C bus, so it is the only read that can
// fail; the presence pin and the ADC always yield a value.

use embedded_hal::digital::InputPin;

use crate::error::BusError;
use crate::types::{Acceleration, RawSample};

/// 3-axis accelerometer reporting m/s².
pub trait MotionSensor {
    fn acceleration(&mut self) -> Result<Acceleration, BusError>;
}

/// Raw, uncalibrated ADC channel.
pub trait AnalogInput {
    fn read_raw(&mut self) -> u16;
}

pub struct SensorReader<P, A, M> {
    presence: P,
    bio_signal: A,
    motion: M,
}

impl<P, A, M> SensorReader<P, A, M>
where
    P: InputPin,
    A: AnalogInput,
    M: MotionSensor,
{
    pub fn new(presence: P, bio_signal: A, motion: M) -> Self {
        Self { presence, bio_signal, motion }
    }

    /// Logic-high on the presence pin means a finger is on the pad. A pin
    /// driver error reads as "no finger".
    pub fn sample_presence(&mut self) -> bool {
        self.presence.is_high().unwrap_or(false)
    }

    pub fn sample_bio_signal(&mut self) -> u16 {
        self.bio_signal.read_raw()
    }

    pub fn sample_motion(&mut self) -> Result<Acceleration, BusError> {
        self.motion.acceleration()
    }

    /// Capture all three sources. A failed motion read discards the whole
    /// sample so the caller never mixes fresh and stale fields.
    pub fn sample(&mut self) -> Result<RawSample, BusError> {
        let presence = self.sample_presence();
        let accel = self.sample_motion()?;
        let bio_signal_raw = self.sample_bio_signal();
        Ok(RawSample { presence, bio_signal_raw, accel })
    }
}


#[cfg(test)]
mod tests {
    use super::fakes::FixedAdc;
    use super::*;
    use crate::config::I2C_ADDR_MPU6050;
    use crate::drivers::imu::Mpu6050;
    use crate::testing::{FakeI2c, FakePin};

    fn reader(
        pin: FakePin,
        bus: FakeI2c,
    ) -> SensorReader<FakePin, FixedAdc, Mpu6050<FakeI2c>> {
        SensorReader::new(pin, FixedAdc(2048), Mpu6050::new(bus))
    }

    #[test]
    fn test_presence_follows_pin_level() {
        let pin = FakePin::new(false);
        let mut reader = reader(pin.clone(), FakeI2c::with_devices());
        assert!(!reader.sample_presence());
        pin.set(true);
        assert!(reader.sample_presence());
    }

    #[test]
    fn test_sample_collects_all_sources() {
        let bus = FakeI2c::with_devices();
        let z = 4096i16.to_be_bytes();
        bus.set_register(I2C_ADDR_MPU6050, 0x3B, &[0, 0, 0, 0, z[0], z[1]]);

        let mut reader = reader(FakePin::new(true), bus);
        let sample = reader.sample().unwrap();
        assert!(sample.presence);
        assert_eq!(sample.bio_signal_raw, 2048);
        assert!((sample.accel.magnitude() - 9.806_65).abs() < 1e-3);
    }

    #[test]
    fn test_motion_fault_fails_the_sample() {
        let bus = FakeI2c::with_devices();
        let mut reader = reader(FakePin::new(true), bus.clone());
        bus.fail_next(1);
        assert!(reader.sample().is_err());
        // transient: next cycle reads fine
        assert!(reader.sample().is_ok());
    }
}
