use crate::model::{DailyForecast, ForecastEntry};

/// Time-of-day marker of the midday sample in `dt_txt`.
pub const MIDDAY_MARKER: &str = "12:00:00";

/// Maximum number of days kept in the daily summary.
pub const MAX_DAYS: usize = 5;

/// Narrow a 3-hourly forecast series to one midday sample per day.
///
/// Order is preserved. Days the series has no midday sample for are skipped,
/// and a short series is returned as-is rather than padded.
pub fn reduce_to_daily(series: &[ForecastEntry]) -> DailyForecast {
    series
        .iter()
        .filter(|entry| entry.local_date_time_text.contains(MIDDAY_MARKER))
        .take(MAX_DAYS)
        .cloned()
        .collect()
}
