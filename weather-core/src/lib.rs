//! Core library for the `simple-weather` status indicator.
//!
//! This crate defines:
//! - Settings storage (API key and target city)
//! - The OpenWeather client behind the [`WeatherClient`] abstraction
//! - The interactive configuration flow
//! - Indicator formatting and the polling controller
//!
//! It does no terminal I/O itself; prompts and the on-screen indicator are
//! supplied by the binary through the [`Prompter`] and [`Indicator`] traits.

pub mod config;
pub mod configure;
pub mod controller;
pub mod icons;
pub mod model;
pub mod presenter;
pub mod provider;

#[cfg(test)]
mod test_support;

pub use config::{FileSettingsStore, Settings, SettingsStore};
pub use configure::{FlowOutcome, PromptRequest, Prompter, run_configuration_flow};
pub use controller::{App, Command, POLL_INTERVAL, PollState};
pub use icons::code_to_glyph;
pub use model::{Location, WeatherReading};
pub use presenter::{Indicator, IndicatorState, PLACEMENT, Placement, Presenter, format_indicator};
pub use provider::{ClientFactory, FetchError, OpenWeatherClient, OpenWeatherFactory, WeatherClient};
