// HealthBand - Display Renderer
//
// Every cycle the current `VitalState` is composed into a `Frame` (a small
// display list), the framebuffer is cleared, the frame is drawn, and the
// whole buffer is pushed. There are no partial updates, so the panel never
// shows fields from two different cycles.
//
// Layout (128x64, 6x10 font, top baseline):
//
//   y=0   HEALTH MONITOR
//   y=10  ------------------------------
//   y=15  BPM: 72              |  y=25  NO FINGER   (x=10)
//   y=27  Status: Resting      |  y=35  DETECTED    (x=10)
//   y=39  ECG: 2048            |

use core::convert::Infallible;
use core::fmt::{self, Write as _};

use embedded_graphics::mono_font::{ascii::FONT_6X10, MonoTextStyle};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle};
use embedded_graphics::text::{Baseline, Text};

use crate::config::SCREEN_WIDTH;
use crate::error::BusError;
use crate::types::VitalState;

pub const TITLE: &str = "HEALTH MONITOR";
pub const WARNING_LINES: [&str; 2] = ["NO FINGER", "DETECTED"];

const RULE_Y: i32 = 10;
const ROW_BPM: Point = Point::new(0, 15);
const ROW_STATUS: Point = Point::new(0, 27);
const ROW_ECG: Point = Point::new(0, 39);
const WARNING_AT: [Point; 2] = [Point::new(10, 25), Point::new(10, 35)];

const MAX_TEXT: usize = 24;
const MAX_ELEMENTS: usize = 8;

/// A panel the renderer can draw on and push to the hardware.
pub trait Screen: DrawTarget<Color = BinaryColor, Error = Infallible> {
    fn flush(&mut self) -> Result<(), BusError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    Text {
        text: heapless::String<MAX_TEXT>,
        at: Point,
    },
    Rule {
        from: Point,
        to: Point,
    },
}

/// One complete screen's worth of content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    elements: heapless::Vec<Element, MAX_ELEMENTS>,
}

impl Frame {
    /// Header plus either the three data rows or the no-finger warning,
    /// never both.
    pub fn compose(state: &VitalState) -> Self {
        let mut frame = Self::default();
        frame.text(Point::zero(), format_args!("{}", TITLE));
        frame.rule(RULE_Y);

        if state.finger_present {
            frame.text(ROW_BPM, format_args!("BPM: {}", state.heart_rate_bpm));
            frame.text(ROW_STATUS, format_args!("Status: {}", state.activity.display_name()));
            frame.text(ROW_ECG, format_args!("ECG: {}", state.bio_signal_raw));
        } else {
            for (line, at) in WARNING_LINES.iter().zip(WARNING_AT) {
                frame.text(at, format_args!("{}", line));
            }
        }
        frame
    }

    /// Single line of text at the top-left corner (boot splash, faults).
    pub fn message(text: &str) -> Self {
        let mut frame = Self::default();
        frame.text(Point::zero(), format_args!("{}", text));
        frame
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.elements.iter().any(|e| match e {
            Element::Text { text, .. } => text.contains(needle),
            Element::Rule { .. } => false,
        })
    }

    pub fn draw<D>(&self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        let text_style = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);
        let line_style = PrimitiveStyle::with_stroke(BinaryColor::On, 1);

        for element in &self.elements {
            match element {
                Element::Text { text, at } => {
                    Text::with_baseline(text, *at, text_style, Baseline::Top).draw(target)?;
                }
                Element::Rule { from, to } => {
                    Line::new(*from, *to).into_styled(line_style).draw(target)?;
                }
            }
        }
        Ok(())
    }

    // Layout strings are sized to fit; anything longer is truncated rather
    // than dropped.
    fn text(&mut self, at: Point, args: fmt::Arguments<'_>) {
        let mut text = heapless::String::new();
        let _ = text.write_fmt(args);
        let _ = self.elements.push(Element::Text { text, at });
    }

    fn rule(&mut self, y: i32) {
        let _ = self.elements.push(Element::Rule {
            from: Point::new(0, y),
            to: Point::new(SCREEN_WIDTH as i32 - 1, y),
        });
    }
}

/// Clear, draw and push `frame` in one go.
pub fn present<S: Screen>(frame: &Frame, screen: &mut S) -> Result<(), BusError> {
    let drawn = screen
        .clear(BinaryColor::Off)
        .and_then(|()| frame.draw(&mut *screen));
    if let Err(never) = drawn {
        match never {}
    }
    screen.flush()
}
