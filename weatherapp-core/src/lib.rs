//! Core library for the `weatherapp` city weather widget.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather provider behind the `WeatherProvider` seam
//! - Forecast reduction, HTML presentation and the search controller
//! - The application context and UI event dispatch
//!
//! It is used by `weatherapp-cli`, but the controller only needs a
//! `DisplaySurface`, so other front ends can drive it too.

pub mod config;
pub mod context;
pub mod controller;
pub mod error;
pub mod event;
pub mod forecast;
pub mod model;
pub mod presenter;
pub mod provider;
pub mod surface;

pub use config::Config;
pub use context::{AppContext, InputField, SearchTrigger};
pub use controller::{SearchController, SearchOutcome};
pub use error::{SearchError, ValidationError};
pub use event::{Key, UiEvent};
pub use forecast::reduce_to_daily;
pub use model::{CityQuery, CurrentConditions, DailyForecast, ForecastEntry, SearchPhase, UiState};
pub use presenter::{Markup, Presenter};
pub use provider::{WeatherProvider, openweather::OpenWeatherProvider};
pub use surface::{DisplaySurface, FileSurface, HtmlBuffer};
