// HealthBand - Samples & Vital State

use crate::config::*;

// ---------------------------------------------------------------------------
// Raw sensor data (one per cycle)
// ---------------------------------------------------------------------------

/// 3-axis acceleration in m/s².
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Acceleration {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Acceleration {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Euclidean norm of the vector.
    pub fn magnitude(&self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

/// Everything the Sensor Reader captures in one cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RawSample {
    pub presence: bool,
    pub bio_signal_raw: u16,
    pub accel: Acceleration,
}

// ---------------------------------------------------------------------------
// Activity Classification
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Activity {
    Resting,
    #[default]
    Moving,
    Active,
}

impl Activity {
    /// Label shown on the display.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Resting => "Resting",
            Self::Moving => "Moving",
            Self::Active => "Active",
        }
    }

    /// Classify a motion magnitude (m/s²).
    ///
    /// The resting band brackets 1 g. Everything outside it and below the
    /// active threshold, including the 9.9..=11.0 gap, reads as `Moving`.
    pub fn from_magnitude(m: f32) -> Self {
        if m > ACTIVE_ABOVE {
            Self::Active
        } else if m < RESTING_HIGH && m > RESTING_LOW {
            Self::Resting
        } else {
            Self::Moving
        }
    }
}

// ---------------------------------------------------------------------------
// Derived state (carried across cycles)
// ---------------------------------------------------------------------------

/// The device's derived health/activity state.
///
/// Invariant: `finger_present == false` implies `heart_rate_bpm == 0`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VitalState {
    pub finger_present: bool,
    pub heart_rate_bpm: u16,
    pub activity: Activity,
    pub bio_signal_raw: u16,
    /// Monotonic milliseconds of the last BPM regeneration (or of the most
    /// recent finger placement, which re-arms the interval).
    pub last_heart_rate_update_ms: u64,
}
