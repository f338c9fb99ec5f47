use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand};
use simple_weather_core::{
    App, ClientFactory, Command as AppCommand, FileSettingsStore, OpenWeatherFactory, PollState,
    SettingsStore, format_indicator,
};
use std::path::PathBuf;
use tokio::sync::mpsc;

use crate::{
    indicator::{LineIndicator, OutputFormat, render_line},
    prompt::InquirePrompter,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "simple-weather", version, about = "Current weather for your status bar")]
pub struct Cli {
    /// Settings file to use instead of the platform default.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable debug logging.
    #[arg(short, long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Poll the weather every five seconds and print indicator updates (default).
    ///
    /// Send SIGUSR1 to re-run the configuration prompts.
    Run {
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Update the city and API key, then show the current weather.
    Configure,

    /// Fetch and print the current weather once.
    Show,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let store = match self.config {
            Some(path) => FileSettingsStore::new(path),
            None => FileSettingsStore::open_default()?,
        };
        tracing::debug!(path = %store.path().display(), "using settings file");

        match self.command.unwrap_or(Command::Run { format: OutputFormat::Text }) {
            Command::Run { format } => run_indicator(store, format).await,
            Command::Configure => configure(store).await,
            Command::Show => show(store).await,
        }
    }
}

fn build_app(store: FileSettingsStore, format: OutputFormat) -> App {
    App::new(
        Box::new(store),
        Box::new(InquirePrompter),
        Box::new(OpenWeatherFactory::default()),
        Box::new(LineIndicator::stdout(format)),
    )
}

async fn run_indicator(store: FileSettingsStore, format: OutputFormat) -> anyhow::Result<()> {
    let mut app = build_app(store, format);
    let (tx, rx) = mpsc::channel(8);
    spawn_signal_forwarder(tx);

    app.run(rx).await
}

async fn configure(store: FileSettingsStore) -> anyhow::Result<()> {
    let path = store.path().clone();
    let mut app = build_app(store, OutputFormat::Full);

    let state = app.update_configuration().await?;
    app.shutdown();

    match state {
        PollState::Active => eprintln!("Settings saved to {}", path.display()),
        PollState::Idle => eprintln!(
            "Configuration is still incomplete ({}). Run `simple-weather configure` again.",
            path.display()
        ),
    }
    Ok(())
}

async fn show(store: FileSettingsStore) -> anyhow::Result<()> {
    let settings = store.load()?;
    let (Some(api_key), Some(location)) = (settings.api_key(), settings.complete_location())
    else {
        return Err(anyhow!(
            "Missing settings: {}.\n\
             Hint: run `simple-weather configure` and enter your city and API key.",
            settings.missing_fields().join(", ")
        ));
    };

    let client = OpenWeatherFactory::default().connect(api_key)?;
    let reading = client
        .current_weather(location)
        .await
        .with_context(|| format!("Failed to fetch weather for {location}"))?;

    let state = format_indicator(&reading, location);
    println!("{}", render_line(OutputFormat::Full, &state, true));
    Ok(())
}

/// SIGUSR1 re-runs configuration; Ctrl-C shuts down.
fn spawn_signal_forwarder(tx: mpsc::Sender<AppCommand>) {
    tokio::spawn(async move {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{SignalKind, signal};

            match signal(SignalKind::user_defined1()) {
                Ok(mut usr1) => loop {
                    tokio::select! {
                        _ = usr1.recv() => {
                            tracing::info!("SIGUSR1 received; updating configuration");
                            if tx.send(AppCommand::UpdateConfiguration).await.is_err() {
                                return;
                            }
                        }
                        _ = tokio::signal::ctrl_c() => break,
                    }
                },
                Err(err) => {
                    tracing::warn!(error = %err, "cannot listen for SIGUSR1");
                    let _ = tokio::signal::ctrl_c().await;
                }
            }
        }
        #[cfg(not(unix))]
        {
            let _ = tokio::signal::ctrl_c().await;
        }

        tracing::info!("shutting down");
        let _ = tx.send(AppCommand::Shutdown).await;
    });
}
