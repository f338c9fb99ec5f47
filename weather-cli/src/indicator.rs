use clap::ValueEnum;
use serde::Serialize;
use simple_weather_core::{Indicator, IndicatorState, PLACEMENT, presenter::Alignment};
use std::io::{self, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Label only, one line per update.
    Text,
    /// One JSON object per line, usable as a waybar/i3bar custom module.
    Json,
    /// Label followed by the tooltip, separated by a blank line.
    Full,
}

#[derive(Debug, Serialize)]
struct StatusLine<'a> {
    text: &'a str,
    tooltip: &'a str,
    class: &'static str,
    align: &'static str,
    priority: i32,
}

/// Render what should be printed for the given state.
///
/// A hidden indicator still prints, so a bar reading stdout clears it.
pub fn render_line(format: OutputFormat, state: &IndicatorState, visible: bool) -> String {
    let empty = IndicatorState::default();
    let state = if visible { state } else { &empty };

    match format {
        OutputFormat::Text => state.label.clone(),
        OutputFormat::Full if state.label.is_empty() => String::new(),
        OutputFormat::Full => format!("{}\n\n{}\n", state.label, state.tooltip),
        OutputFormat::Json => {
            let line = StatusLine {
                text: &state.label,
                tooltip: &state.tooltip,
                class: if visible { "simple-weather" } else { "simple-weather-hidden" },
                align: match PLACEMENT.alignment {
                    Alignment::Left => "left",
                    Alignment::Right => "right",
                },
                priority: PLACEMENT.priority,
            };
            serde_json::to_string(&line).unwrap_or_default()
        }
    }
}

/// Writes every visible change as one line, normally to stdout.
#[derive(Debug)]
pub struct LineIndicator<W> {
    format: OutputFormat,
    state: IndicatorState,
    visible: bool,
    out: W,
}

impl LineIndicator<io::Stdout> {
    pub fn stdout(format: OutputFormat) -> Self {
        Self::new(format, io::stdout())
    }
}

impl<W: Write> LineIndicator<W> {
    pub fn new(format: OutputFormat, out: W) -> Self {
        Self { format, state: IndicatorState::default(), visible: false, out }
    }

    fn emit(&mut self) {
        let line = render_line(self.format, &self.state, self.visible);
        if let Err(err) = writeln!(self.out, "{line}").and_then(|()| self.out.flush()) {
            tracing::debug!(error = %err, "failed to write indicator line");
        }
    }
}

impl<W: Write> Indicator for LineIndicator<W> {
    fn update(&mut self, state: &IndicatorState) {
        self.state = state.clone();
        if self.visible {
            self.emit();
        }
    }

    fn show(&mut self) {
        self.visible = true;
        self.emit();
    }

    fn hide(&mut self) {
        self.visible = false;
        self.emit();
    }
}
