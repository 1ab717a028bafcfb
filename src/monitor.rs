// HealthBand - Monitor Loop
//
// Single-threaded fixed-period driver: sample -> classify -> render, then a
// fixed delay. A failed sensor read skips the cycle and leaves the previous
// frame on the panel; nothing after boot can stop the loop.

use std::time::Instant;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::InputPin;
use embedded_hal::i2c::I2c;

use crate::bus;
use crate::config::MonitorConfig;
use crate::drivers::display::OledDisplay;
use crate::drivers::imu::Mpu6050;
use crate::engine::VitalEngine;
use crate::error::BootError;
use crate::heart_rate::HeartRateSource;
use crate::input::Debounced;
use crate::sensors::{AnalogInput, MotionSensor, SensorReader};
use crate::types::VitalState;
use crate::ui::{self, Frame, Screen};

/// Monotonic millisecond time source.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// Milliseconds since the clock was created (i.e. since boot).
pub struct SystemClock {
    boot: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self { boot: Instant::now() }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.boot.elapsed().as_millis() as u64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// New state derived and pushed to the panel.
    Rendered,
    /// Motion read failed; state and panel left as they were.
    SensorFault,
    /// State updated but the panel write failed.
    DisplayFault,
}

pub struct Monitor<P, A, M, S, D> {
    sensors: SensorReader<P, A, M>,
    engine: VitalEngine<S>,
    screen: D,
    config: MonitorConfig,
    last_frame: Option<Frame>,
}

impl<I, P, A, S> Monitor<Debounced<P>, A, Mpu6050<I>, S, OledDisplay<I>>
where
    I: I2c,
    P: InputPin,
    A: AnalogInput,
    S: HeartRateSource,
{
    /// Bring up the bus peripherals and assemble the loop. On `Err` no
    /// monitor exists, so no frame can ever be rendered.
    pub fn boot<D: DelayNs>(
        display_bus: I,
        imu_bus: I,
        presence: P,
        bio_signal: A,
        heart_rate: S,
        config: MonitorConfig,
        delay: &mut D,
    ) -> Result<Self, BootError> {
        let bus::Peripherals { display, imu } = bus::initialize(display_bus, imu_bus, delay)?;
        let presence = Debounced::new(presence, config.presence_debounce_reads);
        Ok(Self::new(
            SensorReader::new(presence, bio_signal, imu),
            VitalEngine::with_refresh_interval(heart_rate, config.refresh_interval_ms),
            display,
            config,
        ))
    }
}

impl<P, A, M, S, D> Monitor<P, A, M, S, D>
where
    P: InputPin,
    A: AnalogInput,
    M: MotionSensor,
    S: HeartRateSource,
    D: Screen,
{
    pub fn new(
        sensors: SensorReader<P, A, M>,
        engine: VitalEngine<S>,
        screen: D,
        config: MonitorConfig,
    ) -> Self {
        Self {
            sensors,
            engine,
            screen,
            config,
            last_frame: None,
        }
    }

    /// Read-only view of the current state, for anything that wants to log
    /// or forward it after a cycle.
    pub fn vitals(&self) -> &VitalState {
        self.engine.state()
    }

    /// The frame currently on the panel.
    pub fn last_frame(&self) -> Option<&Frame> {
        self.last_frame.as_ref()
    }

    pub fn screen(&self) -> &D {
        &self.screen
    }

    /// One sample -> classify -> render pass at `now_ms`.
    pub fn run_cycle(&mut self, now_ms: u64) -> CycleOutcome {
        let sample = match self.sensors.sample() {
            Ok(sample) => sample,
            Err(e) => {
                log::warn!("Sensor read failed, keeping previous frame: {}", e);
                return CycleOutcome::SensorFault;
            }
        };

        let frame = Frame::compose(self.engine.update(&sample, now_ms));
        match ui::present(&frame, &mut self.screen) {
            Ok(()) => {
                self.last_frame = Some(frame);
                CycleOutcome::Rendered
            }
            Err(e) => {
                log::warn!("Display write failed: {}", e);
                CycleOutcome::DisplayFault
            }
        }
    }

    /// One cycle followed by the fixed loop delay.
    pub fn step<C: Clock, T: DelayNs>(&mut self, clock: &C, delay: &mut T) -> CycleOutcome {
        let outcome = self.run_cycle(clock.now_ms());
        delay.delay_ms(self.config.loop_period_ms);
        outcome
    }

    /// Run until power-off.
    pub fn run<C: Clock, T: DelayNs>(&mut self, clock: &C, delay: &mut T) -> ! {
        log::info!("Entering monitor loop ({} ms period)", self.config.loop_period_ms);
        loop {
            self.step(clock, delay);
        }
    }
}
