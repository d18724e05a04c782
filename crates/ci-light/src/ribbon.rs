//! Rendering status lists on an LED ribbon
//!
//! The device itself is reached through the [`Indicator`] trait. A frame is
//! always a brightness change, one color per slot, then a publish.

use crate::status::DisplayStatus;
use ci_light_config::{BrightnessConfig, LedColor, PaletteConfig, RibbonConfig};
use log::info;

/// Sink for LED frames
pub trait Indicator {
    fn set_brightness(&mut self, level: u8);
    fn set_led(&mut self, index: usize, color: LedColor);
    /// Push the buffered frame to the device
    fn publish(&mut self);
}

/// Maps status lists onto a fixed number of LEDs
#[derive(Debug)]
pub struct Ribbon<I: Indicator> {
    indicator: I,
    slot_count: usize,
    brightness: BrightnessConfig,
    palette: PaletteConfig,
}

impl<I: Indicator> Ribbon<I> {
    pub fn new(indicator: I, config: &RibbonConfig, palette: PaletteConfig) -> Self {
        Self {
            indicator,
            slot_count: config.slot_count,
            brightness: config.brightness,
            palette,
        }
    }

    pub fn indicator(&self) -> &I {
        &self.indicator
    }

    /// Dim standby frame shown before the first poll
    pub fn start(&mut self) {
        info!("Ribbon started");
        self.fill(self.brightness.startup, self.palette.standby);
    }

    /// Show `statuses`, first item on slot 0
    ///
    /// Items past the last slot are not shown. Slots past the last item are
    /// idle. An empty list shows the standby frame.
    pub fn update<S: DisplayStatus>(&mut self, statuses: &[S]) {
        if statuses.is_empty() {
            self.fill(self.brightness.idle, self.palette.standby);
            return;
        }

        self.indicator.set_brightness(self.brightness.active);
        for index in 0..self.slot_count {
            let color = statuses
                .get(index)
                .map_or(self.palette.idle, |status| status.color(&self.palette));
            self.indicator.set_led(index, color);
        }
        self.indicator.publish();
    }

    fn fill(&mut self, brightness: u8, color: LedColor) {
        self.indicator.set_brightness(brightness);
        for index in 0..self.slot_count {
            self.indicator.set_led(index, color);
        }
        self.indicator.publish();
    }
}

/// Indicator that logs every published frame
///
/// Used when no hardware is attached.
#[derive(Debug, Clone, Default)]
pub struct ConsoleIndicator {
    brightness: u8,
    leds: Vec<LedColor>,
}

impl ConsoleIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// One character per slot
    pub fn render(&self) -> String {
        self.leds.iter().map(|c| symbol(*c)).collect()
    }
}

fn symbol(color: LedColor) -> char {
    match color {
        LedColor::Green => 'G',
        LedColor::Yellow => 'Y',
        LedColor::Orange => 'O',
        LedColor::Red => 'R',
        LedColor::Blue => 'B',
        LedColor::Purple => 'P',
        LedColor::White => 'W',
        LedColor::Black => '.',
    }
}

impl Indicator for ConsoleIndicator {
    fn set_brightness(&mut self, level: u8) {
        self.brightness = level;
    }

    fn set_led(&mut self, index: usize, color: LedColor) {
        if index >= self.leds.len() {
            self.leds.resize(index + 1, LedColor::Black);
        }
        self.leds[index] = color;
    }

    fn publish(&mut self) {
        info!("[{}] brightness {}", self.render(), self.brightness);
    }
}
