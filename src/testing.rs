// HealthBand - Host-side test doubles
//
// Fakes for the embedded-hal traits the firmware is written against, so the
// drivers, the Sensor Reader and the loop driver run under `cargo test`.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType as PinErrorType, InputPin};
use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};

use crate::monitor::Clock;

// ---------------------------------------------------------------------------
// I2C bus
// ---------------------------------------------------------------------------

#[derive(Default)]
struct BusState {
    /// Addresses that NAK every transaction.
    absent: HashSet<u8>,
    /// Register contents served to `write_read(addr, [reg], ..)`.
    registers: HashMap<(u8, u8), Vec<u8>>,
    /// Every write payload, per address, in order.
    writes: Vec<(u8, Vec<u8>)>,
    /// Remaining transactions to fail with a bus error (transient fault).
    fail_next: usize,
    /// Same, but only for transactions addressed to one device.
    fail_next_to: HashMap<u8, usize>,
}

/// Scriptable shared I2C bus. Clones share the same state, so one handle can
/// be given to a driver while the test keeps another for inspection.
#[derive(Clone, Default)]
pub struct FakeI2c {
    state: Rc<RefCell<BusState>>,
}

impl FakeI2c {
    pub fn new() -> Self {
        Self::default()
    }

    /// A bus with a responding SSD1306 and MPU6050 on it.
    pub fn with_devices() -> Self {
        let bus = Self::new();
        bus.set_register(crate::config::I2C_ADDR_MPU6050, 0x75, &[0x68]);
        bus.set_register(crate::config::I2C_ADDR_MPU6050, 0x3B, &[0; 6]);
        bus
    }

    pub fn remove_device(&self, address: u8) {
        self.state.borrow_mut().absent.insert(address);
    }

    pub fn set_register(&self, address: u8, register: u8, bytes: &[u8]) {
        self.state
            .borrow_mut()
            .registers
            .insert((address, register), bytes.to_vec());
    }

    pub fn fail_next(&self, transactions: usize) {
        self.state.borrow_mut().fail_next = transactions;
    }

    pub fn fail_next_to(&self, address: u8, transactions: usize) {
        self.state.borrow_mut().fail_next_to.insert(address, transactions);
    }

    pub fn writes_to(&self, address: u8) -> Vec<Vec<u8>> {
        self.state
            .borrow()
            .writes
            .iter()
            .filter(|(a, _)| *a == address)
            .map(|(_, w)| w.clone())
            .collect()
    }

    /// Number of data (control byte 0x40) writes sent to `address`.
    pub fn data_writes_to(&self, address: u8) -> usize {
        self.writes_to(address)
            .iter()
            .filter(|w| w.first() == Some(&0x40))
            .count()
    }
}

impl ErrorType for FakeI2c {
    type Error = ErrorKind;
}

impl I2c for FakeI2c {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        let mut state = self.state.borrow_mut();
        if state.absent.contains(&address) {
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        }
        if state.fail_next > 0 {
            state.fail_next -= 1;
            return Err(ErrorKind::Bus);
        }
        if let Some(remaining) = state.fail_next_to.get_mut(&address) {
            if *remaining > 0 {
                *remaining -= 1;
                return Err(ErrorKind::Bus);
            }
        }

        let mut register = None;
        for op in operations.iter_mut() {
            match op {
                Operation::Write(bytes) => {
                    register = bytes.first().copied();
                    state.writes.push((address, bytes.to_vec()));
                }
                Operation::Read(buf) => {
                    let src = register
                        .and_then(|r| state.registers.get(&(address, r)))
                        .cloned()
                        .unwrap_or_default();
                    for (i, b) in buf.iter_mut().enumerate() {
                        *b = src.get(i).copied().unwrap_or(0);
                    }
                }
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// GPIO
// ---------------------------------------------------------------------------

/// Presence switch whose level the test flips through a shared handle.
#[derive(Clone, Default)]
pub struct FakePin {
    level: Rc<Cell<bool>>,
}

impl FakePin {
    pub fn new(high: bool) -> Self {
        let pin = Self::default();
        pin.set(high);
        pin
    }

    pub fn set(&self, high: bool) {
        self.level.set(high);
    }
}

impl PinErrorType for FakePin {
    type Error = Infallible;
}

impl InputPin for FakePin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.level.get())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.level.get())
    }
}

/// Pin that plays back a fixed sequence of levels, then holds the last one.
pub struct ScriptedPin {
    levels: Vec<bool>,
    next: usize,
}

impl ScriptedPin {
    pub fn new(levels: &[bool]) -> Self {
        Self { levels: levels.to_vec(), next: 0 }
    }
}

impl PinErrorType for ScriptedPin {
    type Error = Infallible;
}

impl InputPin for ScriptedPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        let level = self.levels[self.next.min(self.levels.len() - 1)];
        self.next += 1;
        Ok(level)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.is_high().map(|h| !h)
    }
}

// ---------------------------------------------------------------------------
// Time
// ---------------------------------------------------------------------------

/// Clock the test advances by hand; shared with `FakeDelay`.
#[derive(Clone, Default)]
pub struct ManualClock {
    now_ms: Rc<Cell<u64>>,
}

impl ManualClock {
    pub fn advance(&self, ms: u64) {
        self.now_ms.set(self.now_ms.get() + ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now_ms.get()
    }
}

/// Delay that advances a `ManualClock` instead of sleeping.
pub struct FakeDelay {
    pub clock: ManualClock,
    pub total_ms: u64,
}

impl FakeDelay {
    pub fn new(clock: ManualClock) -> Self {
        Self { clock, total_ms: 0 }
    }
}

impl DelayNs for FakeDelay {
    fn delay_ns(&mut self, ns: u32) {
        let ms = u64::from(ns / 1_000_000);
        self.total_ms += ms;
        self.clock.advance(ms);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.total_ms += u64::from(ms);
        self.clock.advance(u64::from(ms));
    }
}
