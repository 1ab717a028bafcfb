// HealthBand - SSD1306 OLED Driver
//
// Register-level driver for a 128x64 SSD1306 on the shared I2C bus. Drawing
// goes into a page-mode framebuffer through `embedded-graphics`; nothing
// reaches the panel until `flush()`.

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_hal::i2c::I2c;

use crate::config::*;
use crate::error::BusError;
use crate::ui::Screen;

// I2C control bytes
const CONTROL_COMMAND: u8 = 0x00;
const CONTROL_DATA: u8 = 0x40;

/// Bytes of pixel data per I2C write (plus one control byte).
const DATA_CHUNK: usize = 16;

/// Power-on sequence for an internally pumped (switch-cap VCC) 128x64 panel.
const INIT_SEQUENCE: &[u8] = &[
    0xAE,       // display off
    0xD5, 0x80, // clock divide
    0xA8, 0x3F, // multiplex 64
    0xD3, 0x00, // no display offset
    0x40,       // start line 0
    0x8D, 0x14, // charge pump on
    0x20, 0x00, // horizontal addressing
    0xA1,       // segment remap
    0xC8,       // COM scan descending
    0xDA, 0x12, // COM pins
    0x81, 0xCF, // contrast
    0xD9, 0xF1, // pre-charge
    0xDB, 0x40, // VCOMH deselect
    0xA4,       // resume to RAM content
    0xA6,       // normal (not inverted)
    0x2E,       // scrolling off
    0xAF,       // display on
];

pub struct OledDisplay<I> {
    bus: I,
    address: u8,
    buffer: [u8; DISPLAY_BUFFER_SIZE],
}

impl<I: I2c> OledDisplay<I> {
    pub fn new(bus: I) -> Self {
        Self {
            bus,
            address: I2C_ADDR_OLED,
            buffer: [0; DISPLAY_BUFFER_SIZE],
        }
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    /// Bring the controller online. Fails if the panel does not acknowledge.
    pub fn init(&mut self) -> Result<(), BusError> {
        for cmd in INIT_SEQUENCE {
            self.command(&[*cmd])?;
        }
        self.buffer.fill(0);
        self.flush()?;
        log::info!("SSD1306 initialised ({}x{} @ 0x{:02X})", SCREEN_WIDTH, SCREEN_HEIGHT, self.address);
        Ok(())
    }

    /// Push the whole framebuffer to the panel.
    pub fn flush(&mut self) -> Result<(), BusError> {
        // Column 0..=127, page 0..=7
        self.command(&[0x21, 0x00, (SCREEN_WIDTH - 1) as u8])?;
        self.command(&[0x22, 0x00, (SCREEN_HEIGHT / 8 - 1) as u8])?;

        let mut packet = [0u8; DATA_CHUNK + 1];
        packet[0] = CONTROL_DATA;
        for chunk in self.buffer.chunks(DATA_CHUNK) {
            packet[1..=chunk.len()].copy_from_slice(chunk);
            self.bus
                .write(self.address, &packet[..=chunk.len()])
                .map_err(BusError::i2c)?;
        }
        Ok(())
    }

    /// Raw framebuffer, page-major (8 vertical pixels per byte).
    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    pub fn pixel(&self, x: u32, y: u32) -> bool {
        let (idx, bit) = locate(x, y);
        self.buffer[idx] & bit != 0
    }

    fn command(&mut self, bytes: &[u8]) -> Result<(), BusError> {
        let mut packet = [0u8; 4];
        packet[0] = CONTROL_COMMAND;
        packet[1..=bytes.len()].copy_from_slice(bytes);
        self.bus
            .write(self.address, &packet[..=bytes.len()])
            .map_err(BusError::i2c)
    }
}

/// Framebuffer byte index and bit mask for a pixel.
fn locate(x: u32, y: u32) -> (usize, u8) {
    let idx = x as usize + (y as usize / 8) * SCREEN_WIDTH as usize;
    (idx, 1 << (y % 8))
}

impl<I> OriginDimensions for OledDisplay<I> {
    fn size(&self) -> Size {
        Size::new(SCREEN_WIDTH, SCREEN_HEIGHT)
    }
}

impl<I> DrawTarget for OledDisplay<I> {
    type Color = BinaryColor;
    type Error = core::convert::Infallible;

    fn draw_iter<P>(&mut self, pixels: P) -> Result<(), Self::Error>
    where
        P: IntoIterator<Item = Pixel<BinaryColor>>,
    {
        for Pixel(point, color) in pixels {
            if point.x < 0
                || point.y < 0
                || point.x >= SCREEN_WIDTH as i32
                || point.y >= SCREEN_HEIGHT as i32
            {
                continue;
            }
            let (idx, bit) = locate(point.x as u32, point.y as u32);
            match color {
                BinaryColor::On => self.buffer[idx] |= bit,
                BinaryColor::Off => self.buffer[idx] &= !bit,
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: BinaryColor) -> Result<(), Self::Error> {
        let fill = match color {
            BinaryColor::On => 0xFF,
            BinaryColor::Off => 0x00,
        };
        self.buffer.fill(fill);
        Ok(())
    }
}

impl<I: I2c> Screen for OledDisplay<I> {
    fn flush(&mut self) -> Result<(), BusError> {
        OledDisplay::flush(self)
    }
}
