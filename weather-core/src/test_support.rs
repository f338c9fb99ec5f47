//! In-memory doubles shared by the unit tests.

use anyhow::Result;
use async_trait::async_trait;
use std::{
    cell::RefCell,
    collections::VecDeque,
    rc::Rc,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use crate::{
    config::{Settings, SettingsStore},
    configure::{PromptRequest, Prompter},
    model::{Location, WeatherReading},
    presenter::{Indicator, IndicatorState},
    provider::{FetchError, WeatherClient},
};

pub fn clear_sky() -> WeatherReading {
    WeatherReading {
        condition_code: "01d".into(),
        title: "Clear".into(),
        description: "clear sky".into(),
        temperature: 23.456,
        pressure: 1013.0,
        humidity: 40.0,
    }
}

pub fn complete_settings() -> Settings {
    Settings {
        api_key: Some("KEY".into()),
        location: Some(Location::new("Caxias do Sul", "BR")),
    }
}

#[derive(Default)]
pub struct MemoryStore {
    settings: Mutex<Settings>,
    saves: AtomicUsize,
}

impl MemoryStore {
    pub fn with(settings: Settings) -> Self {
        Self { settings: Mutex::new(settings), saves: AtomicUsize::new(0) }
    }

    pub fn settings(&self) -> Settings {
        self.settings.lock().unwrap().clone()
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

impl SettingsStore for MemoryStore {
    fn load(&self) -> Result<Settings> {
        Ok(self.settings())
    }

    fn save(&self, settings: &Settings) -> Result<()> {
        *self.settings.lock().unwrap() = settings.clone();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

impl SettingsStore for Arc<MemoryStore> {
    fn load(&self) -> Result<Settings> {
        self.as_ref().load()
    }

    fn save(&self, settings: &Settings) -> Result<()> {
        self.as_ref().save(settings)
    }
}

/// Answers prompts from a script; cancels once the script runs out.
#[derive(Default)]
pub struct ScriptedPrompter {
    answers: Mutex<VecDeque<Option<String>>>,
    requests: Mutex<Vec<PromptRequest>>,
    /// Zero-based index of the prompt that returns an error.
    fail_at: Option<usize>,
    delay: Option<Duration>,
}

impl ScriptedPrompter {
    pub fn new<const N: usize>(answers: [Option<&str>; N]) -> Self {
        Self {
            answers: Mutex::new(answers.into_iter().map(|a| a.map(str::to_owned)).collect()),
            requests: Mutex::default(),
            fail_at: None,
            delay: None,
        }
    }

    pub fn failing_at(mut self, index: usize) -> Self {
        self.fail_at = Some(index);
        self
    }

    /// Each answer takes `delay` to arrive.
    pub fn slow(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn requests(&self) -> Vec<PromptRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Prompter for ScriptedPrompter {
    async fn prompt(&self, request: &PromptRequest) -> Result<Option<String>> {
        let index = {
            let mut requests = self.requests.lock().unwrap();
            requests.push(request.clone());
            requests.len() - 1
        };
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_at == Some(index) {
            anyhow::bail!("terminal closed");
        }
        Ok(self.answers.lock().unwrap().pop_front().flatten())
    }
}

#[async_trait]
impl Prompter for Arc<ScriptedPrompter> {
    async fn prompt(&self, request: &PromptRequest) -> Result<Option<String>> {
        self.as_ref().prompt(request).await
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndicatorCall {
    Update(IndicatorState),
    Show,
    Hide,
}

#[derive(Default)]
pub struct RecordingIndicator {
    calls: Rc<RefCell<Vec<IndicatorCall>>>,
}

impl RecordingIndicator {
    pub fn calls(&self) -> Rc<RefCell<Vec<IndicatorCall>>> {
        Rc::clone(&self.calls)
    }
}

impl Indicator for RecordingIndicator {
    fn update(&mut self, state: &IndicatorState) {
        self.calls.borrow_mut().push(IndicatorCall::Update(state.clone()));
    }

    fn show(&mut self) {
        self.calls.borrow_mut().push(IndicatorCall::Show);
    }

    fn hide(&mut self) {
        self.calls.borrow_mut().push(IndicatorCall::Hide);
    }
}

/// Weather client that replays scripted results and counts calls.
///
/// Once the script is exhausted every call returns [`clear_sky`].
#[derive(Debug, Default)]
pub struct StubClient {
    results: Mutex<VecDeque<Result<WeatherReading, FetchError>>>,
    calls: AtomicUsize,
    delay: Option<Duration>,
}

impl StubClient {
    pub fn new(results: Vec<Result<WeatherReading, FetchError>>) -> Self {
        Self { results: Mutex::new(results.into()), ..Self::default() }
    }

    pub fn slow(delay: Duration) -> Self {
        Self { delay: Some(delay), ..Self::default() }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WeatherClient for StubClient {
    async fn current_weather(&self, _location: &Location) -> Result<WeatherReading, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let next = self.results.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Ok(clear_sky()))
    }
}

pub fn transport_failure() -> FetchError {
    FetchError::Status { status: 502, body: "bad gateway".into() }
}
