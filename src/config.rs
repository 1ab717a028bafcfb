// HealthBand - Hardware & System Configuration
// Target: ESP32-S2 Mini (Xtensa)

// ---------------------------------------------------------------------------
// GPIO Pin Definitions (ESP32-S2 Mini)
// ---------------------------------------------------------------------------
pub const PIN_I2C_SDA: i32 = 33;     // I2C data line
pub const PIN_I2C_SCL: i32 = 35;     // I2C clock line
pub const PIN_FINGER_SWITCH: i32 = 1; // Presence switch (HIGH = finger on the pad)
pub const PIN_BIO_SIGNAL: i32 = 3;   // ADC1_CH2 - ECG front-end output

// ---------------------------------------------------------------------------
// I2C Bus
// ---------------------------------------------------------------------------
pub const I2C_BAUDRATE_KHZ: u32 = 400;
pub const I2C_ADDR_MPU6050: u8 = 0x68;
pub const I2C_ADDR_OLED: u8 = 0x3C;

// ---------------------------------------------------------------------------
// Display (SSD1306 OLED)
// ---------------------------------------------------------------------------
pub const SCREEN_WIDTH: u32 = 128;
pub const SCREEN_HEIGHT: u32 = 64;
pub const DISPLAY_BUFFER_SIZE: usize = (SCREEN_WIDTH as usize * SCREEN_HEIGHT as usize) / 8; // 1024

// ---------------------------------------------------------------------------
// Timing (milliseconds)
// ---------------------------------------------------------------------------
pub const LOOP_PERIOD_MS: u32 = 100;            // ~10 Hz refresh
pub const HEART_RATE_REFRESH_MS: u64 = 2000;    // BPM regenerated at most this often
pub const BOOT_SPLASH_MS: u32 = 1000;           // "System Ready" splash duration
pub const PRESENCE_DEBOUNCE_READS: u8 = 3;      // consecutive reads before the level flips

// ---------------------------------------------------------------------------
// Vital-state classification
// ---------------------------------------------------------------------------
pub const BPM_MIN: u16 = 68;
pub const BPM_MAX: u16 = 85; // inclusive

pub const ACTIVE_ABOVE: f32 = 11.0;  // m/s²
pub const RESTING_LOW: f32 = 9.7;    // exclusive
pub const RESTING_HIGH: f32 = 9.9;   // exclusive

// ---------------------------------------------------------------------------
// MPU6050 Sensor Scale Factors
// ---------------------------------------------------------------------------
pub const ACCEL_SCALE_8G: f32 = 4096.0;     // LSB/g at ±8 g
pub const STANDARD_GRAVITY: f32 = 9.806_65; // m/s² per g

// ---------------------------------------------------------------------------
// Runtime knobs
// ---------------------------------------------------------------------------

/// Tunables for the monitor loop. `Default` matches the constants above.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorConfig {
    /// Minimum time between two heart-rate regenerations.
    pub refresh_interval_ms: u64,
    /// Fixed delay inserted after each rendered cycle.
    pub loop_period_ms: u32,
    /// Consecutive identical presence reads required before the level flips.
    /// `1` disables debouncing.
    pub presence_debounce_reads: u8,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            refresh_interval_ms: HEART_RATE_REFRESH_MS,
            loop_period_ms: LOOP_PERIOD_MS,
            presence_debounce_reads: PRESENCE_DEBOUNCE_READS,
        }
    }
}
