//! Turns a [`WeatherReading`] into indicator text and pushes it to the display.

use crate::{
    icons::code_to_glyph,
    model::{Location, WeatherReading},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Right,
}

/// Where the indicator sits among its peers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub alignment: Alignment,
    /// Lower sorts later.
    pub priority: i32,
}

pub const PLACEMENT: Placement = Placement { alignment: Alignment::Right, priority: -10 };

/// Label and tooltip currently on screen. Always replaced as a pair.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IndicatorState {
    pub label: String,
    pub tooltip: String,
}

/// A persistent status display.
pub trait Indicator {
    fn update(&mut self, state: &IndicatorState);
    fn show(&mut self);
    fn hide(&mut self);
}

pub fn format_indicator(reading: &WeatherReading, location: &Location) -> IndicatorState {
    let glyph = code_to_glyph(&reading.condition_code);
    let temperature = format!("{:.1} °C", round_tenths(reading.temperature));

    let label = format!("{glyph} {temperature}");
    let tooltip = [
        location.city_name.clone(),
        format!("{glyph} {} - {}", reading.title, reading.description),
        format!("Temperature: {temperature}"),
        format!("Pressure: {}", reading.pressure),
        format!("Humidity: {}%", reading.humidity),
    ]
    .join("\n");

    IndicatorState { label, tooltip }
}

/// Round to one decimal, ties away from zero (`{:.1}` alone ties to even).
fn round_tenths(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub struct Presenter {
    indicator: Box<dyn Indicator>,
    state: Option<IndicatorState>,
    visible: bool,
}

impl Presenter {
    pub fn new(indicator: Box<dyn Indicator>) -> Self {
        Self { indicator, state: None, visible: false }
    }

    pub fn render(&mut self, reading: &WeatherReading, location: &Location) {
        let state = format_indicator(reading, location);
        self.indicator.update(&state);
        self.state = Some(state);
        self.show();
    }

    pub fn show(&mut self) {
        if !self.visible {
            self.indicator.show();
            self.visible = true;
        }
    }

    pub fn hide(&mut self) {
        if self.visible {
            self.indicator.hide();
            self.visible = false;
        }
    }

    pub fn state(&self) -> Option<&IndicatorState> {
        self.state.as_ref()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }
}
