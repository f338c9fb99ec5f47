use serde::{Deserialize, Serialize};
use std::fmt;

/// City the indicator reports on.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Location {
    pub city_name: String,
    pub country_code: String,
}

impl Location {
    pub fn new(city_name: impl Into<String>, country_code: impl Into<String>) -> Self {
        Self { city_name: city_name.into(), country_code: country_code.into() }
    }

    /// Parse user input of the form `"City, CC"`.
    ///
    /// Splits on the first comma and trims both halves. No validation is
    /// done here: input without a comma yields an empty country code, which
    /// [`Location::is_complete`] later rejects.
    pub fn parse(input: &str) -> Self {
        let (city, country) = input.split_once(',').unwrap_or((input, ""));
        Self::new(city.trim(), country.trim())
    }

    pub fn is_complete(&self) -> bool {
        !self.city_name.is_empty() && !self.country_code.is_empty()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.city_name, self.country_code)
    }
}

/// Current conditions as reported by the provider, in metric units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    pub condition_code: String,
    pub title: String,
    pub description: String,
    pub temperature: f64,
    pub pressure: f64,
    pub humidity: f64,
}
