//! Search orchestration: validation, the two concurrent lookups, and the
//! view transitions around them.

use tracing::{debug, error, info, instrument, warn};

use crate::{
    context::AppContext,
    error::SearchError,
    forecast::reduce_to_daily,
    model::{CityQuery, CurrentConditions, DailyForecast, SearchPhase, UiState},
    presenter::{PresenterError, Presenter},
    provider::WeatherProvider,
    surface::DisplaySurface,
};

/// How a single submission ended.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Success,
    Failure(SearchError),
    /// A search was already in flight; nothing was done.
    Ignored,
}

#[derive(Debug)]
pub struct SearchController {
    provider: Box<dyn WeatherProvider>,
    presenter: Presenter,
}

impl SearchController {
    pub fn new(provider: Box<dyn WeatherProvider>, presenter: Presenter) -> Self {
        Self {
            provider,
            presenter,
        }
    }

    pub fn show_welcome<S: DisplaySurface>(&self, ctx: &mut AppContext<S>) {
        if let Err(err) = self.show(ctx, UiState::Welcome) {
            error!(%err, "failed to render welcome view");
        }
    }

    /// Run one search cycle for the raw text the user entered.
    ///
    /// The trigger is back to enabled with its original label on every return.
    #[instrument(skip(self, ctx))]
    pub async fn submit_search<S: DisplaySurface>(
        &self,
        ctx: &mut AppContext<S>,
        raw_input: &str,
    ) -> SearchOutcome {
        if !ctx.trigger.enabled {
            debug!("search already in flight, ignoring submission");
            return SearchOutcome::Ignored;
        }

        ctx.phase = SearchPhase::Validating;
        let city = match CityQuery::parse(raw_input) {
            Ok(city) => city,
            Err(err) => {
                debug!(%err, "rejected input");
                return self.finish(ctx, Err(err.into()));
            }
        };

        ctx.phase = SearchPhase::Loading;
        if let Err(err) = self.show(ctx, UiState::Loading) {
            warn!(%err, "failed to render loading view");
        }
        ctx.trigger.set_busy();
        ctx.input.clear();

        info!(%city, "fetching weather");
        let result = self.lookup(&city).await;
        self.finish(ctx, result)
    }

    /// Fetch current conditions and forecast concurrently, failing as soon as
    /// either does.
    async fn lookup(
        &self,
        city: &CityQuery,
    ) -> Result<(CurrentConditions, DailyForecast), SearchError> {
        let (current, series) =
            tokio::try_join!(self.provider.current(city), self.provider.forecast(city))
                .map_err(|err| {
                    warn!(%city, %err, "weather lookup failed");
                    SearchError::from_provider(city.as_str(), err)
                })?;

        let daily = reduce_to_daily(&series);
        debug!(series = series.len(), days = daily.len(), "forecast reduced");
        Ok((current, daily))
    }

    fn finish<S: DisplaySurface>(
        &self,
        ctx: &mut AppContext<S>,
        result: Result<(CurrentConditions, DailyForecast), SearchError>,
    ) -> SearchOutcome {
        let result = result.and_then(|(current, daily)| {
            ctx.phase = SearchPhase::Success;
            self.show(ctx, UiState::Result { current, daily }).map_err(|err| {
                error!(%err, "failed to render weather");
                SearchError::Transport(err.to_string())
            })
        });

        let outcome = match result {
            Ok(()) => {
                ctx.input.focus();
                SearchOutcome::Success
            }
            Err(err) => {
                ctx.phase = SearchPhase::Failure;
                if let Err(render_err) = self.show(ctx, UiState::Error(err.clone())) {
                    error!(err = %render_err, "failed to render error view");
                }
                SearchOutcome::Failure(err)
            }
        };

        ctx.trigger.reset();
        ctx.phase = SearchPhase::Idle;
        outcome
    }

    /// Render `state` and replace the surface with it. A failed write is
    /// recorded on the context rather than failing the search.
    fn show<S: DisplaySurface>(
        &self,
        ctx: &mut AppContext<S>,
        state: UiState,
    ) -> Result<(), PresenterError> {
        let markup = self.presenter.render_state(&state)?;

        match ctx.surface.replace(&markup) {
            Ok(()) => {
                ctx.view = state;
                ctx.write_error = None;
            }
            Err(err) => {
                warn!(%err, "display surface write failed");
                ctx.write_error = Some(err);
            }
        }
        Ok(())
    }
}
