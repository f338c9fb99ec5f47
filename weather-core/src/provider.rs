use crate::model::{Location, WeatherReading};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};
use thiserror::Error;

pub mod openweather;

pub use openweather::OpenWeatherClient;

/// Why a single weather fetch failed.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to weather provider failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("weather provider rejected the API key: {0}")]
    Auth(String),

    #[error("location not found by weather provider: {0}")]
    NotFound(String),

    #[error("weather provider returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to decode weather response: {0}")]
    Decode(String),
}

#[async_trait]
pub trait WeatherClient: Send + Sync + Debug {
    async fn current_weather(&self, location: &Location) -> Result<WeatherReading, FetchError>;
}

/// Builds a [`WeatherClient`] for a given API key.
pub trait ClientFactory {
    fn connect(&self, api_key: &str) -> anyhow::Result<Arc<dyn WeatherClient>>;
}

impl<F> ClientFactory for F
where
    F: Fn(&str) -> anyhow::Result<Arc<dyn WeatherClient>>,
{
    fn connect(&self, api_key: &str) -> anyhow::Result<Arc<dyn WeatherClient>> {
        self(api_key)
    }
}

/// Production factory: OpenWeather clients, optionally against another base URL.
#[derive(Debug, Clone, Default)]
pub struct OpenWeatherFactory {
    base_url: Option<String>,
}

impl OpenWeatherFactory {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self { base_url: Some(base_url.into()) }
    }
}

impl ClientFactory for OpenWeatherFactory {
    fn connect(&self, api_key: &str) -> anyhow::Result<Arc<dyn WeatherClient>> {
        let client = match &self.base_url {
            Some(url) => OpenWeatherClient::with_base_url(api_key.to_owned(), url.clone())?,
            None => OpenWeatherClient::new(api_key.to_owned())?,
        };
        let client: Arc<dyn WeatherClient> = Arc::new(client);
        Ok(client)
    }
}
