use chrono::{DateTime, Duration, Local, NaiveTime};
use tracing::debug;

use crate::models::{ForecastPoint, WindGustForecast};

/// Forecast points later than this many hours after local midnight are not
/// alert-relevant, even when they exceed the threshold. Bounds alerts to
/// the workday-relevant part of the current day.
pub const DAYTIME_WINDOW_HOURS: i64 = 19;

/// Result of scanning one day's forecast against the gust threshold
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub exceeds: bool,
    pub max_gust: f64,
    pub qualifying: Vec<WindGustForecast>,
}

/// Scan `points` for entries inside today's daytime window whose gust value
/// strictly exceeds `threshold`. The window is half-open:
/// `[start_of_day, start_of_day + 19h)`. Qualifying points keep the
/// provider's chronological order; `max_gust` is 0.0 when nothing qualifies.
pub fn evaluate(points: &[ForecastPoint], threshold: f64, now: DateTime<Local>) -> Evaluation {
    let window_start = start_of_day(now);
    let window_end = window_start + Duration::hours(DAYTIME_WINDOW_HOURS);

    let mut qualifying = Vec::new();

    for point in points {
        if point.time < window_start || point.time >= window_end {
            continue;
        }

        debug!(
            time = %point.time.format("%H:%M"),
            wind_gust = point.wind_gust,
            temperature = point.temperature,
            description = %point.description,
            "Forecast point inside daytime window"
        );

        if point.wind_gust > threshold {
            qualifying.push(WindGustForecast {
                time: point.time,
                wind_gust: point.wind_gust,
            });
        }
    }

    let max_gust = qualifying
        .iter()
        .map(|forecast| forecast.wind_gust)
        .reduce(f64::max)
        .unwrap_or(0.0);

    Evaluation {
        exceeds: !qualifying.is_empty(),
        max_gust,
        qualifying,
    }
}

/// Local midnight of the day containing `now`. A DST gap at midnight maps
/// to the earliest valid instant of that day.
pub fn start_of_day(now: DateTime<Local>) -> DateTime<Local> {
    now.with_time(NaiveTime::MIN).earliest().unwrap_or(now)
}
