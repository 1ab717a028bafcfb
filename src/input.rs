// HealthBand - Presence Switch Debouncer
//
// Decorator around any `InputPin`: the reported level only changes after
// `reads` consecutive raw reads agree on the new level. The Vital-State
// Engine stays memoryless; all hysteresis lives here, in front of the
// Sensor Reader.

use embedded_hal::digital::{ErrorType, InputPin};

pub struct Debounced<P> {
    pin: P,
    reads: u8,

    // Debounce state
    stable: Option<bool>,
    candidate: bool,
    streak: u8,
}

impl<P: InputPin> Debounced<P> {
    /// `reads <= 1` makes this a pass-through.
    pub fn new(pin: P, reads: u8) -> Self {
        Self {
            pin,
            reads: reads.max(1),
            stable: None,
            candidate: false,
            streak: 0,
        }
    }

    pub fn into_inner(self) -> P {
        self.pin
    }

    fn update(&mut self) -> Result<bool, P::Error> {
        let raw = self.pin.is_high()?;

        // The first read seeds the stable level so boot does not wait out a
        // full debounce window.
        let Some(stable) = self.stable else {
            self.stable = Some(raw);
            return Ok(raw);
        };

        if raw == stable {
            self.streak = 0;
            return Ok(stable);
        }

        if raw == self.candidate && self.streak > 0 {
            self.streak = self.streak.saturating_add(1);
        } else {
            self.candidate = raw;
            self.streak = 1;
        }

        if self.streak >= self.reads {
            log::debug!("Presence level settled: {}", raw);
            self.stable = Some(raw);
            self.streak = 0;
            return Ok(raw);
        }
        Ok(stable)
    }
}

impl<P: InputPin> ErrorType for Debounced<P> {
    type Error = P::Error;
}

impl<P: InputPin> InputPin for Debounced<P> {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.update()
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.update().map(|high| !high)
    }
}
