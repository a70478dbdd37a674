use std::fmt;

use crate::error::{SearchError, ValidationError};

/// Minimum number of characters a city name must have after trimming.
pub const MIN_CITY_LEN: usize = 2;

/// A validated city name, as sent verbatim to the upstream API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityQuery(String);

impl CityQuery {
    /// Trim the raw user input and validate it.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let city = raw.trim();

        if city.is_empty() {
            return Err(ValidationError::Empty);
        }

        if city.chars().count() < MIN_CITY_LEN {
            return Err(ValidationError::TooShort);
        }

        Ok(Self(city.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CityQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Present-moment weather snapshot for a city.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentConditions {
    pub city_name: String,
    pub temperature_c: f64,
    pub description: String,
    pub icon_id: String,
}

/// One 3-hourly sample of the forecast series.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastEntry {
    pub timestamp_utc: i64,
    pub temperature_c: f64,
    pub description: String,
    pub icon_id: String,
    /// Text timestamp as reported by the API, e.g. "2024-05-01 12:00:00".
    pub local_date_time_text: String,
}

pub type ForecastSeries = Vec<ForecastEntry>;

/// Up to five midday samples, in source order.
pub type DailyForecast = Vec<ForecastEntry>;

/// What the display surface currently shows.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum UiState {
    #[default]
    Welcome,
    Loading,
    Result {
        current: CurrentConditions,
        daily: DailyForecast,
    },
    Error(SearchError),
}

/// Position of the search controller state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchPhase {
    #[default]
    Idle,
    Validating,
    Loading,
    Success,
    Failure,
}
