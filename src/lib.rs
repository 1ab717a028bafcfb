// HealthBand - Wearable health-monitor firmware core
//
// Polls a finger-presence switch, an analog bio-signal input and an MPU6050,
// derives presence / heart rate / activity, and draws them on a 128x64
// SSD1306 at ~10 Hz. Everything except the ESP-IDF bindings builds and
// tests on the host.

pub mod bus;
pub mod config;
pub mod drivers;
pub mod engine;
pub mod error;
pub mod heart_rate;
pub mod input;
pub mod monitor;
pub mod sensors;
pub mod types;
pub mod ui;

#[cfg(test)]
mod testing;
