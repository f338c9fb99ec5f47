//! Glyphs for OpenWeather icon codes.

/// Shown for any condition code missing from the table.
pub const UNKNOWN_GLYPH: &str = "🌡️";

/// Map an OpenWeather icon code (e.g. `"01d"`) to a display glyph.
///
/// Day and night variants share a glyph except for clear sky.
pub fn code_to_glyph(code: &str) -> &'static str {
    match code {
        "01d" => "☀️",
        "01n" => "🌙",
        "02d" | "02n" => "⛅",
        "03d" | "03n" | "04d" | "04n" => "☁️",
        "09d" | "09n" | "10d" | "10n" => "☔️",
        "11d" | "11n" => "⚡️",
        "13d" | "13n" => "❄️",
        "50d" | "50n" => "🌫",
        _ => UNKNOWN_GLYPH,
    }
}
