// HealthBand - Vital-State Engine
//
// Turns one `RawSample` per cycle into the device's `VitalState`.
//
// Presence is re-evaluated from scratch every cycle (no latching):
//   - finger lifted  -> BPM forced to 0 on that same cycle
//   - finger placed  -> refresh timer re-armed, BPM stays 0 for one full
//                       interval before the first value appears
//   - finger on      -> a new BPM is drawn once `refresh_interval_ms` has
//                       strictly elapsed since the last one
//
// Activity is classified from the current motion magnitude alone.

use crate::config::HEART_RATE_REFRESH_MS;
use crate::heart_rate::HeartRateSource;
use crate::types::{Activity, RawSample, VitalState};

pub struct VitalEngine<S> {
    state: VitalState,
    source: S,
    refresh_interval_ms: u64,
}

impl<S: HeartRateSource> VitalEngine<S> {
    pub fn new(source: S) -> Self {
        Self::with_refresh_interval(source, HEART_RATE_REFRESH_MS)
    }

    pub fn with_refresh_interval(source: S, refresh_interval_ms: u64) -> Self {
        Self {
            state: VitalState::default(),
            source,
            refresh_interval_ms,
        }
    }

    pub fn state(&self) -> &VitalState {
        &self.state
    }

    /// Fold one sample taken at `now_ms` (monotonic) into the state.
    pub fn update(&mut self, sample: &RawSample, now_ms: u64) -> &VitalState {
        let was_present = self.state.finger_present;
        self.state.finger_present = sample.presence;

        match (was_present, sample.presence) {
            (_, false) => {
                if was_present {
                    log::info!("Finger removed");
                }
                self.state.heart_rate_bpm = 0;
            }
            (false, true) => {
                log::info!("Finger detected");
                self.state.heart_rate_bpm = 0;
                self.state.last_heart_rate_update_ms = now_ms;
            }
            (true, true) => {
                let elapsed = now_ms.saturating_sub(self.state.last_heart_rate_update_ms);
                if elapsed > self.refresh_interval_ms {
                    self.state.heart_rate_bpm = self.source.next_bpm();
                    self.state.last_heart_rate_update_ms = now_ms;
                    log::debug!("Heart rate: {} BPM", self.state.heart_rate_bpm);
                }
            }
        }

        self.state.activity = Activity::from_magnitude(sample.accel.magnitude());
        self.state.bio_signal_raw = sample.bio_signal_raw;
        &self.state
    }
}
