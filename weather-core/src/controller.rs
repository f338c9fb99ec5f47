//! Polling lifecycle and the single dispatcher loop that drives it.
//!
//! All state lives in [`App`]. Timer ticks and fetch completions arrive as
//! events on one channel, user commands on another, and both are handled
//! one at a time by [`App::run`]. Fetches started by a tick run on a
//! spawned task; their results come back through the event channel.

use anyhow::Result;
use std::{sync::Arc, time::Duration};
use tokio::{
    sync::mpsc,
    task::JoinHandle,
    time::{Instant, MissedTickBehavior},
};

use crate::{
    config::{Settings, SettingsStore},
    configure::{Prompter, run_configuration_flow},
    model::{Location, WeatherReading},
    presenter::{Indicator, Presenter},
    provider::{ClientFactory, FetchError, WeatherClient},
};

pub const POLL_INTERVAL: Duration = Duration::from_millis(5000);

/// How many times `initialize` may open the configuration flow on its own
/// before giving up and staying idle.
const AUTO_CONFIGURE_ATTEMPTS: u8 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    Idle,
    Active,
}

/// User-invoked actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    UpdateConfiguration,
    Shutdown,
}

#[derive(Debug)]
enum Event {
    Tick { generation: u64 },
    FetchDone { generation: u64, result: Result<WeatherReading, FetchError> },
}

struct Active {
    client: Arc<dyn WeatherClient>,
    location: Location,
}

/// Recurring tick source. Dropping it stops the ticks.
struct Timer {
    handle: JoinHandle<()>,
}

impl Timer {
    fn arm(generation: u64, period: Duration, events: mpsc::UnboundedSender<Event>) -> Self {
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if events.send(Event::Tick { generation }).is_err() {
                    break;
                }
            }
        });
        Self { handle }
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

pub struct App {
    store: Box<dyn SettingsStore>,
    prompter: Box<dyn Prompter>,
    factory: Box<dyn ClientFactory>,
    presenter: Presenter,
    active: Option<Active>,
    timer: Option<Timer>,
    /// Bumped on every (re)activation and deactivation; ticks and results
    /// carrying an older value are dropped.
    generation: u64,
    in_flight: bool,
    events_tx: mpsc::UnboundedSender<Event>,
    events_rx: mpsc::UnboundedReceiver<Event>,
}

impl App {
    pub fn new(
        store: Box<dyn SettingsStore>,
        prompter: Box<dyn Prompter>,
        factory: Box<dyn ClientFactory>,
        indicator: Box<dyn Indicator>,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            store,
            prompter,
            factory,
            presenter: Presenter::new(indicator),
            active: None,
            timer: None,
            generation: 0,
            in_flight: false,
            events_tx,
            events_rx,
        }
    }

    pub fn state(&self) -> PollState {
        if self.active.is_some() { PollState::Active } else { PollState::Idle }
    }

    pub fn presenter(&self) -> &Presenter {
        &self.presenter
    }

    pub fn is_timer_armed(&self) -> bool {
        self.timer.is_some()
    }

    /// Start polling with the stored settings.
    ///
    /// Incomplete settings stop polling and open the configuration flow,
    /// at most [`AUTO_CONFIGURE_ATTEMPTS`] times; if they are still
    /// incomplete afterwards the app stays idle with the indicator hidden.
    pub async fn initialize(&mut self) -> Result<PollState> {
        let mut attempts = 0;
        loop {
            let settings = self.store.load()?;
            if settings.is_complete() {
                self.activate(&settings).await?;
                return Ok(PollState::Active);
            }

            self.deactivate();
            if attempts == AUTO_CONFIGURE_ATTEMPTS {
                tracing::warn!(
                    missing = ?settings.missing_fields(),
                    "configuration incomplete; staying idle until it is updated"
                );
                return Ok(PollState::Idle);
            }

            attempts += 1;
            tracing::info!(missing = ?settings.missing_fields(), "configuration incomplete");
            run_configuration_flow(self.store.as_ref(), self.prompter.as_ref()).await?;
        }
    }

    /// Run the configuration flow, then re-initialize whatever the outcome.
    ///
    /// Answers saved before a failing prompt stay saved and are picked up
    /// by the re-initialization; the flow error is returned afterwards.
    pub async fn update_configuration(&mut self) -> Result<PollState> {
        // no ticks pile up while the prompts are open
        self.timer = None;

        let flow = run_configuration_flow(self.store.as_ref(), self.prompter.as_ref()).await;
        match &flow {
            Ok(outcome) => tracing::debug!(?outcome, "configuration flow finished"),
            Err(err) => tracing::warn!(error = %err, "configuration flow aborted"),
        }

        let state = match self.initialize().await {
            Ok(state) => state,
            Err(err) => {
                self.deactivate();
                return Err(err);
            }
        };
        flow.map(|_| state)
    }

    /// Fetch once and render the result. Does nothing when not configured.
    pub async fn fetch_and_render(&mut self) -> Result<(), FetchError> {
        let Some(active) = &self.active else {
            return Ok(());
        };
        let client = Arc::clone(&active.client);
        let location = active.location.clone();

        let reading = client.current_weather(&location).await?;
        self.presenter.render(&reading, &location);
        Ok(())
    }

    /// Initialize, then dispatch events and commands until shutdown.
    pub async fn run(&mut self, commands: mpsc::Receiver<Command>) -> Result<()> {
        self.initialize().await?;
        self.event_loop(commands).await
    }

    /// Stop polling.
    pub fn shutdown(&mut self) {
        self.timer = None;
        self.active = None;
        self.in_flight = false;
        tracing::debug!("polling stopped");
    }

    pub(crate) async fn event_loop(&mut self, mut commands: mpsc::Receiver<Command>) -> Result<()> {
        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(Command::UpdateConfiguration) => {
                        if let Err(err) = self.update_configuration().await {
                            tracing::error!(error = %err, "failed to update configuration");
                        }
                    }
                    Some(Command::Shutdown) | None => break,
                },
                Some(event) = self.events_rx.recv() => self.handle_event(event),
            }
        }

        self.shutdown();
        Ok(())
    }

    async fn activate(&mut self, settings: &Settings) -> Result<()> {
        let (Some(api_key), Some(location)) = (settings.api_key(), settings.complete_location())
        else {
            return Ok(());
        };

        let client = match self.factory.connect(api_key) {
            Ok(client) => client,
            Err(err) => {
                self.deactivate();
                return Err(err);
            }
        };

        self.timer = None;
        self.generation += 1;
        self.in_flight = false;
        self.active = Some(Active { client, location: location.clone() });
        tracing::info!(
            city = %location.city_name,
            country = %location.country_code,
            interval_ms = POLL_INTERVAL.as_millis() as u64,
            "polling started"
        );

        if let Err(err) = self.fetch_and_render().await {
            tracing::warn!(error = %err, "initial weather fetch failed");
        }

        self.timer = Some(Timer::arm(self.generation, POLL_INTERVAL, self.events_tx.clone()));
        Ok(())
    }

    fn deactivate(&mut self) {
        self.timer = None;
        self.generation += 1;
        self.in_flight = false;
        self.active = None;
        self.presenter.hide();
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Tick { generation } => self.on_tick(generation),
            Event::FetchDone { generation, result } => self.on_fetch_done(generation, result),
        }
    }

    fn on_tick(&mut self, generation: u64) {
        if generation != self.generation {
            return;
        }
        let Some(active) = &self.active else {
            return;
        };
        if self.in_flight {
            tracing::debug!("previous fetch still running; skipping tick");
            return;
        }

        self.in_flight = true;
        let client = Arc::clone(&active.client);
        let location = active.location.clone();
        let events = self.events_tx.clone();
        tokio::spawn(async move {
            let result = client.current_weather(&location).await;
            let _ = events.send(Event::FetchDone { generation, result });
        });
    }

    fn on_fetch_done(&mut self, generation: u64, result: Result<WeatherReading, FetchError>) {
        if generation != self.generation {
            tracing::debug!("dropping result from a previous configuration");
            return;
        }
        self.in_flight = false;

        let Some(active) = &self.active else {
            return;
        };
        match result {
            Ok(reading) => {
                tracing::debug!(temperature = reading.temperature, code = %reading.condition_code, "weather updated");
                self.presenter.render(&reading, &active.location);
            }
            Err(err) => tracing::warn!(error = %err, "weather fetch failed; keeping last reading"),
        }
    }
}
