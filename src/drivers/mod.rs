#[cfg(target_os = "espidf")]
pub mod adc;
pub mod display;
pub mod imu;
