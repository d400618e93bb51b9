use chrono::{DateTime, Local};
use serde::Deserialize;

/// Geocoding result for the configured city
#[derive(Debug, Clone, Deserialize)]
pub struct GeoLocation {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub country: String,
}

/// One forecast entry, reduced to the fields the service cares about.
/// Temperature and description are informational only; alerting looks at
/// the gust value and the timestamp.
#[derive(Debug, Clone)]
pub struct ForecastPoint {
    pub time: DateTime<Local>,
    pub wind_gust: f64,
    pub temperature: f64,
    pub description: String,
}

/// A forecast point that exceeded the gust threshold inside the daytime window
#[derive(Debug, Clone, PartialEq)]
pub struct WindGustForecast {
    pub time: DateTime<Local>,
    pub wind_gust: f64,
}
