//! Error taxonomy surfaced by a search cycle.

use thiserror::Error;

use crate::provider::ProviderError;

/// Input rejected before any network activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a city name!")]
    Empty,

    #[error("City name is too short.")]
    TooShort,
}

/// Every way a search can fail. Each variant maps to one user-visible message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("\"{city}\" not found. Please check spelling.")]
    NotFound { city: String },

    /// Network failure, timeout, non-404 status or an unreadable response.
    #[error("Something went wrong. Please try again later.")]
    Transport(String),
}

impl SearchError {
    pub fn from_provider(city: &str, err: ProviderError) -> Self {
        match err {
            ProviderError::NotFound => SearchError::NotFound {
                city: city.to_string(),
            },
            other => SearchError::Transport(other.to_string()),
        }
    }

    /// Message shown to the user. Never includes transport details.
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}
