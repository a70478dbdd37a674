//! HTML rendering of every view the widget can show.
//!
//! Templates are embedded at compile time and rendered with Tera, which
//! escapes every interpolated value. Each render returns the complete markup
//! for the display surface; nothing is patched incrementally.

use chrono::{DateTime, FixedOffset, Local, Offset};
use serde::Serialize;
use std::{fmt, sync::Arc};
use tera::{Context, Tera};
use thiserror::Error;

use crate::{
    Config,
    error::SearchError,
    model::{CurrentConditions, DailyForecast, ForecastEntry, UiState},
};

pub const DEFAULT_ICON_BASE_URL: &str = "https://openweathermap.org/img/wn";

mod templates {
    pub const WELCOME: &str = r#"
<div class="welcome-message">
    <div style="font-size: 3rem;">🌤️</div>
    <h2>Welcome to WeatherApp</h2>
    <p>Enter a city name above to get the current weather and 5-day forecast.</p>
</div>
"#;

    pub const LOADING: &str = r#"
<div class="loading-container">
    <div class="spinner"></div>
    <p>Fetching weather...</p>
</div>
"#;

    pub const ERROR: &str = r#"
<div class="error-message">
    <p>⚠️ {% if city %}"<strong>{{ city }}</strong>" not found. Please check spelling.{% else %}{{ message }}{% endif %}</p>
</div>
"#;

    pub const CURRENT: &str = r#"
<div class="weather-info">
    <h2 class="city-name">{{ city_name }}</h2>
    <img src="{{ icon_base | safe }}/{{ icon }}@2x.png" alt="{{ description }}" class="weather-icon">
    <div class="temperature">{{ temperature }}°C</div>
    <p class="description">{{ description }}</p>
</div>
"#;

    pub const FORECAST: &str = r#"
<div class="forecast-section">
    <h3 class="forecast-title">5-Day Forecast</h3>
    <div class="forecast-container" style="display: flex; justify-content: space-around; gap: 10px; margin-top: 20px;">
{%- for day in days %}
        <div class="forecast-card">
            <div class="forecast-day">{{ day.weekday }}</div>
            <img src="{{ icon_base | safe }}/{{ day.icon }}@2x.png" alt="{{ day.description }}">
            <div class="forecast-temp">{{ day.temperature }}°C</div>
            <div class="forecast-desc">{{ day.description }}</div>
        </div>
{%- endfor %}
    </div>
</div>
"#;
}

#[derive(Debug, Error)]
pub enum PresenterError {
    #[error("template error: {0}")]
    Template(#[from] tera::Error),
}

/// Rendered HTML for the display surface.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Markup(String);

impl Markup {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Markup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Markup {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Debug, Serialize)]
struct DayView<'a> {
    weekday: String,
    temperature: i64,
    description: &'a str,
    icon: &'a str,
}

/// Nearest whole degree, halves rounded away from zero.
pub fn round_celsius(temperature_c: f64) -> i64 {
    temperature_c.round() as i64
}

/// Formats weather data into display markup.
#[derive(Clone)]
pub struct Presenter {
    tera: Arc<Tera>,
    icon_base_url: String,
    offset: FixedOffset,
}

impl fmt::Debug for Presenter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Presenter")
            .field("icon_base_url", &self.icon_base_url)
            .field("offset", &self.offset)
            .finish_non_exhaustive()
    }
}

impl Presenter {
    /// `offset` is the viewer's UTC offset, used to pick forecast weekdays.
    pub fn new(
        icon_base_url: impl Into<String>,
        offset: FixedOffset,
    ) -> Result<Self, PresenterError> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            ("welcome.html", templates::WELCOME),
            ("loading.html", templates::LOADING),
            ("error.html", templates::ERROR),
            ("current.html", templates::CURRENT),
            ("forecast.html", templates::FORECAST),
        ])?;

        let icon_base_url = icon_base_url.into().trim_end_matches('/').to_string();

        Ok(Self {
            tera: Arc::new(tera),
            icon_base_url,
            offset,
        })
    }

    /// Presenter for the configured icon host in the machine's local offset.
    pub fn from_config(config: &Config) -> Result<Self, PresenterError> {
        Self::new(config.icon_base_url.clone(), Local::now().offset().fix())
    }

    pub fn render_welcome(&self) -> Result<Markup, PresenterError> {
        self.render("welcome.html", &Context::new())
    }

    pub fn render_loading(&self) -> Result<Markup, PresenterError> {
        self.render("loading.html", &Context::new())
    }

    pub fn render_error(&self, error: &SearchError) -> Result<Markup, PresenterError> {
        let mut ctx = Context::new();
        match error {
            SearchError::NotFound { city } => ctx.insert("city", city),
            other => {
                ctx.insert("city", &Option::<&str>::None);
                ctx.insert("message", &other.user_message());
            }
        }
        self.render("error.html", &ctx)
    }

    pub fn render_current(
        &self,
        conditions: &CurrentConditions,
    ) -> Result<Markup, PresenterError> {
        let mut ctx = Context::new();
        ctx.insert("icon_base", &self.icon_base_url);
        ctx.insert("city_name", &conditions.city_name);
        ctx.insert("temperature", &round_celsius(conditions.temperature_c));
        ctx.insert("description", &conditions.description);
        ctx.insert("icon", &conditions.icon_id);
        self.render("current.html", &ctx)
    }

    pub fn render_forecast(&self, days: &DailyForecast) -> Result<Markup, PresenterError> {
        let views: Vec<DayView<'_>> = days.iter().map(|day| self.day_view(day)).collect();

        let mut ctx = Context::new();
        ctx.insert("icon_base", &self.icon_base_url);
        ctx.insert("days", &views);
        self.render("forecast.html", &ctx)
    }

    /// Current conditions followed by the forecast, as one replacement.
    pub fn render_result(
        &self,
        conditions: &CurrentConditions,
        days: &DailyForecast,
    ) -> Result<Markup, PresenterError> {
        let mut html = self.render_current(conditions)?.into_string();
        html.push_str(self.render_forecast(days)?.as_str());
        Ok(Markup(html))
    }

    pub fn render_state(&self, state: &UiState) -> Result<Markup, PresenterError> {
        match state {
            UiState::Welcome => self.render_welcome(),
            UiState::Loading => self.render_loading(),
            UiState::Result { current, daily } => self.render_result(current, daily),
            UiState::Error(err) => self.render_error(err),
        }
    }

    /// Short English weekday name ("Mon") of a UTC timestamp in the viewer's offset.
    pub fn weekday_label(&self, timestamp_utc: i64) -> String {
        DateTime::from_timestamp(timestamp_utc, 0)
            .map(|dt| dt.with_timezone(&self.offset).format("%a").to_string())
            .unwrap_or_default()
    }

    fn day_view<'a>(&self, day: &'a ForecastEntry) -> DayView<'a> {
        DayView {
            weekday: self.weekday_label(day.timestamp_utc),
            temperature: round_celsius(day.temperature_c),
            description: &day.description,
            icon: &day.icon_id,
        }
    }

    fn render(&self, template: &str, ctx: &Context) -> Result<Markup, PresenterError> {
        Ok(Markup(self.tera.render(template, ctx)?))
    }
}
