use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::{
    Config,
    model::{CityQuery, CurrentConditions, ForecastEntry, ForecastSeries},
};

use super::{ProviderError, WeatherProvider};

pub const DEFAULT_CURRENT_URL: &str = "https://api.openweathermap.org/data/2.5/weather";
pub const DEFAULT_FORECAST_URL: &str = "https://api.openweathermap.org/data/2.5/forecast";

const UNITS: &str = "metric";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    current_url: String,
    forecast_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            current_url: DEFAULT_CURRENT_URL.to_string(),
            forecast_url: DEFAULT_FORECAST_URL.to_string(),
            http: Client::new(),
        }
    }

    /// Build a provider using the endpoints and timeout from `config`.
    pub fn from_config(api_key: String, config: &Config) -> Result<Self, ProviderError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            api_key,
            current_url: config.current_url.clone(),
            forecast_url: config.forecast_url.clone(),
            http,
        })
    }

    /// Point the provider at different endpoints, e.g. a mock server.
    pub fn with_endpoints(
        mut self,
        current_url: impl Into<String>,
        forecast_url: impl Into<String>,
    ) -> Self {
        self.current_url = current_url.into();
        self.forecast_url = forecast_url.into();
        self
    }

    /// GET `url` with the city query and return the raw body of a successful response.
    async fn get(&self, url: &str, city: &CityQuery) -> Result<String, ProviderError> {
        let res = self
            .http
            .get(url)
            .query(&[
                ("q", city.as_str()),
                ("appid", self.api_key.as_str()),
                ("units", UNITS),
            ])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if status == StatusCode::NOT_FOUND {
            debug!(%city, "OpenWeather does not know this city");
            return Err(ProviderError::NotFound);
        }

        if !status.is_success() {
            warn!(%status, "OpenWeather request failed");
            return Err(ProviderError::Status {
                status,
                body: truncate_body(&body),
            });
        }

        Ok(body)
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    dt_txt: String,
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastEntry>,
}

/// Description and icon of the first `weather[]` element.
fn first_condition(weather: Vec<OwWeather>) -> (String, String) {
    weather
        .into_iter()
        .next()
        .map(|w| (w.description, w.icon))
        .unwrap_or_else(|| ("Unknown".to_string(), String::new()))
}

fn parse_current(body: &str) -> Result<CurrentConditions, ProviderError> {
    let parsed: OwCurrentResponse = serde_json::from_str(body)?;
    let (description, icon_id) = first_condition(parsed.weather);

    Ok(CurrentConditions {
        city_name: parsed.name,
        temperature_c: parsed.main.temp,
        description,
        icon_id,
    })
}

fn parse_forecast(body: &str) -> Result<ForecastSeries, ProviderError> {
    let parsed: OwForecastResponse = serde_json::from_str(body)?;

    Ok(parsed
        .list
        .into_iter()
        .map(|entry| {
            let (description, icon_id) = first_condition(entry.weather);
            ForecastEntry {
                timestamp_utc: entry.dt,
                temperature_c: entry.main.temp,
                description,
                icon_id,
                local_date_time_text: entry.dt_txt,
            }
        })
        .collect())
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    #[instrument(skip(self, city), fields(city = %city))]
    async fn current(&self, city: &CityQuery) -> Result<CurrentConditions, ProviderError> {
        let body = self.get(&self.current_url, city).await?;
        parse_current(&body)
    }

    #[instrument(skip(self, city), fields(city = %city))]
    async fn forecast(&self, city: &CityQuery) -> Result<ForecastSeries, ProviderError> {
        let body = self.get(&self.forecast_url, city).await?;
        let series = parse_forecast(&body)?;
        debug!(entries = series.len(), "forecast series received");
        Ok(series)
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
