use crate::{
    Config,
    model::{CityQuery, CurrentConditions, ForecastSeries},
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use reqwest::StatusCode;
use std::fmt::Debug;
use thiserror::Error;

pub mod openweather;

/// Failures talking to the upstream weather API.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The API answered 404: it does not know the city.
    #[error("city not found")]
    NotFound,

    #[error("request failed with status {status}: {body}")]
    Status { status: StatusCode, body: String },

    /// Connection refused, DNS failure, timeout and the like. Never carries
    /// the request URL, which includes the API key.
    #[error("transport error: {0}")]
    Transport(reqwest::Error),

    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.without_url())
    }
}

/// Upstream source of current conditions and forecasts, looked up by city name.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current(&self, city: &CityQuery) -> Result<CurrentConditions, ProviderError>;

    async fn forecast(&self, city: &CityQuery) -> Result<ForecastSeries, ProviderError>;
}

/// Construct the OpenWeather provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = config.api_key().ok_or_else(|| {
        anyhow::anyhow!(
            "No API key configured.\n\
                 Hint: run `weatherapp configure` and enter your OpenWeather API key."
        )
    })?;

    let provider = OpenWeatherProvider::from_config(api_key.to_owned(), config)?;
    Ok(Box::new(provider))
}
