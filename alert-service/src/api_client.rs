use chrono::{DateTime, Local};
use common::errors::AppError;
use common::http_client::HttpClient;
use serde::Deserialize;
use tracing::{info, instrument, warn};

use crate::models::{ForecastPoint, GeoLocation};

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    #[serde(default)]
    list: Vec<ForecastEntry>,
}

#[derive(Debug, Deserialize)]
struct ForecastEntry {
    dt: i64,
    main: MainData,
    #[serde(default)]
    wind: WindData,
    #[serde(default)]
    weather: Vec<WeatherDesc>,
}

#[derive(Debug, Deserialize)]
struct MainData {
    temp: f64,
}

// The provider omits `gust` for calm entries; zero keeps those below any
// sensible threshold.
#[derive(Debug, Default, Deserialize)]
struct WindData {
    #[serde(default)]
    gust: f64,
}

#[derive(Debug, Deserialize)]
struct WeatherDesc {
    #[serde(default)]
    description: String,
}

const HTTP_TIMEOUT_SECS: u64 = 10;

/// Client for the OpenWeatherMap geocoding and 5-day forecast APIs.
/// Base URLs are injectable so tests can point at a mock server.
pub struct OpenWeatherClient {
    http_client: HttpClient,
    api_key: String,
    geocoding_url: String,
    forecast_url: String,
}

impl OpenWeatherClient {
    pub fn new(
        api_key: String,
        geocoding_url: String,
        forecast_url: String,
        retries: u32,
    ) -> Self {
        Self {
            http_client: HttpClient::new(HTTP_TIMEOUT_SECS, retries),
            api_key,
            geocoding_url,
            forecast_url,
        }
    }

    /// Resolve the configured place name to coordinates. An empty result
    /// set is a lookup failure, terminal for the current cycle.
    #[instrument(skip(self), fields(city = %city))]
    pub async fn resolve_coordinates(&self, city: &str) -> Result<GeoLocation, AppError> {
        let url = format!(
            "{}?q={}&limit=1&appid={}",
            self.geocoding_url,
            urlencoding::encode(city),
            self.api_key
        );

        let mut locations: Vec<GeoLocation> = self.http_client.get_json(&url).await?;

        if locations.is_empty() {
            return Err(AppError::lookup(format!(
                "No coordinates found for city: {}",
                city
            )));
        }

        let location = locations.remove(0);
        info!(
            "Resolved coordinates for {}: lat {:.4}, lon {:.4}",
            location.name, location.lat, location.lon
        );

        Ok(location)
    }

    /// Fetch the multi-point forecast for the given coordinates, metric units.
    #[instrument(skip(self))]
    pub async fn fetch_forecast(&self, lat: f64, lon: f64) -> Result<Vec<ForecastPoint>, AppError> {
        let url = format!(
            "{}?lat={:.4}&lon={:.4}&units=metric&appid={}",
            self.forecast_url, lat, lon, self.api_key
        );

        let response: ForecastResponse = self.http_client.get_json(&url).await?;

        let points = response
            .list
            .into_iter()
            .filter_map(|entry| {
                let Some(time) = DateTime::from_timestamp(entry.dt, 0) else {
                    warn!(dt = entry.dt, "Skipping forecast entry with invalid timestamp");
                    return None;
                };

                Some(ForecastPoint {
                    time: time.with_timezone(&Local),
                    wind_gust: entry.wind.gust,
                    temperature: entry.main.temp,
                    description: entry
                        .weather
                        .first()
                        .map(|w| w.description.clone())
                        .unwrap_or_default(),
                })
            })
            .collect();

        Ok(points)
    }
}
