// HealthBand - Firmware Entry Point
//
// Boot sequence:
//   1. Configure the shared I2C bus (SDA 33 / SCL 35) and the input pins.
//   2. Bring up the SSD1306 and the MPU6050; either one missing halts here.
//   3. Show "System Ready" for 1 second.
//   4. Run the sample -> classify -> render loop at ~10 Hz until power-off.

#[cfg(target_os = "espidf")]
fn main() -> anyhow::Result<()> {
    device::main()
}

#[cfg(not(target_os = "espidf"))]
fn main() {
    eprintln!("healthband is ESP32-S2 firmware; build it for the xtensa-esp32s2-espidf target");
}

#[cfg(target_os = "espidf")]
mod device {
    use core::cell::RefCell;
    use std::thread;

    use embedded_hal_bus::i2c::RefCellDevice;
    use esp_idf_hal::delay::FreeRtos;
    use esp_idf_hal::gpio::{AnyInputPin, Input, InputPin, PinDriver};
    use esp_idf_hal::i2c::{I2cConfig, I2cDriver};
    use esp_idf_hal::prelude::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    use healthband::config::*;
    use healthband::drivers::adc::OneshotAdc;
    use healthband::error::BootError;
    use healthband::heart_rate::PlaceholderHeartRate;
    use healthband::monitor::{Monitor, SystemClock};

    pub fn main() -> anyhow::Result<()> {
        // Link esp-idf-sys runtime patches and initialise logging.
        esp_idf_svc::sys::link_patches();
        esp_idf_svc::log::EspLogger::initialize_default();
        log::info!("HealthBand firmware starting");

        let clock = SystemClock::new();
        let mut delay = FreeRtos;

        // ---- Peripherals --------------------------------------------------
        let peripherals = Peripherals::take()?;

        // Presence switch: HIGH when a finger closes it, pulled low otherwise.
        let finger = PinDriver::input(peripherals.pins.gpio1.downgrade_input())?;
        configure_pulldown(&finger);

        let bio_signal = OneshotAdc::new(esp_idf_svc::sys::adc_channel_t_ADC_CHANNEL_2)?;

        // ---- I2C bus (shared between OLED and MPU6050) --------------------
        let i2c_config = I2cConfig::new().baudrate(I2C_BAUDRATE_KHZ.kHz().into());
        let i2c = I2cDriver::new(
            peripherals.i2c0,
            peripherals.pins.gpio33, // SDA
            peripherals.pins.gpio35, // SCL
            &i2c_config,
        )?;
        let i2c_bus = RefCell::new(i2c);

        // ---- Heart-rate placeholder, seeded from the hardware RNG ---------
        // SAFETY: esp_random only reads the RNG peripheral.
        let seed = unsafe {
            (u64::from(esp_idf_svc::sys::esp_random()) << 32) | u64::from(esp_idf_svc::sys::esp_random())
        };
        let heart_rate = PlaceholderHeartRate::new(SmallRng::seed_from_u64(seed));

        // ---- Bring-up ------------------------------------------------------
        let booted = Monitor::boot(
            RefCellDevice::new(&i2c_bus),
            RefCellDevice::new(&i2c_bus),
            finger,
            bio_signal,
            heart_rate,
            MonitorConfig::default(),
            &mut delay,
        );
        let mut monitor = match booted {
            Ok(monitor) => monitor,
            Err(e) => halt(e),
        };

        monitor.run(&clock, &mut delay)
    }

    /// Terminal state after a failed bring-up: report once, then park the
    /// main task without spinning. Only a reset leaves this state.
    fn halt(err: BootError) -> ! {
        log::error!("HALTED: {}", err);
        loop {
            thread::park();
        }
    }

    /// Enable the internal pull-down on the presence pin via the raw API
    /// (the downgraded pin type does not expose `set_pull`).
    fn configure_pulldown(_pin: &PinDriver<'_, AnyInputPin, Input>) {
        // SAFETY: only touches the pull configuration of our own pin.
        unsafe {
            esp_idf_svc::sys::gpio_set_pull_mode(
                PIN_FINGER_SWITCH,
                esp_idf_svc::sys::gpio_pull_mode_t_GPIO_PULLDOWN_ONLY,
            );
        }
    }
}
