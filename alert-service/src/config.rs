use std::env;

use common::errors::AppError;
use tracing::warn;

pub const DEFAULT_WIND_GUST_THRESHOLD: f64 = 15.0;
pub const DEFAULT_NOTIFICATION_HOUR: u32 = 9;
pub const DEFAULT_NOTIFICATION_MIN: u32 = 0;
pub const DEFAULT_HTTP_RETRIES: u32 = 0;

const DEFAULT_GEOCODING_URL: &str = "http://api.openweathermap.org/geo/1.0/direct";
const DEFAULT_FORECAST_URL: &str = "https://api.openweathermap.org/data/2.5/forecast";

/// Process configuration, loaded once at startup and passed by reference
/// everywhere. No derive on Debug so SMTP credentials never end up in logs.
#[derive(Clone)]
#[cfg_attr(test, derive(Debug))]
pub struct Config {
    pub api_key: String,
    pub city: String,
    pub email_from: String,
    pub email_to: Vec<String>,
    pub smtp_server: String,
    pub smtp_port: u16,
    pub smtp_user: String,
    pub smtp_password: String,
    pub wind_gust_threshold: f64,
    pub notification_hour: u32,
    pub notification_min: u32,
    pub http_retries: u32,
    pub geocoding_url: String,
    pub forecast_url: String,
}

impl Config {
    /// Load and validate configuration from the environment. Missing
    /// required fields are fatal; optional fields fall back to defaults
    /// with a logged warning when they fail to parse.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Validation core over an injectable variable lookup so the fail-fast
    /// rules are testable without mutating the process environment.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let get = |name: &str| lookup(name).unwrap_or_default();

        let api_key = get("OPENWEATHER_API_KEY");
        if api_key.is_empty() {
            return Err(AppError::config("OPENWEATHER_API_KEY is not set"));
        }

        let city = get("CITY");
        if city.is_empty() {
            return Err(AppError::config("CITY is not set"));
        }

        let email_from = get("EMAIL_FROM");
        if email_from.is_empty() {
            return Err(AppError::config("EMAIL_FROM is not set"));
        }

        let email_to = parse_recipients(&get("EMAIL_TO"));
        if email_to.is_empty() {
            return Err(AppError::config("EMAIL_TO must contain at least one recipient"));
        }

        let smtp_server = get("SMTP_SERVER");
        if smtp_server.is_empty() {
            return Err(AppError::config("SMTP_SERVER is not set"));
        }

        let smtp_port = lookup("SMTP_PORT")
            .filter(|p| !p.is_empty())
            .ok_or_else(|| AppError::config("SMTP_PORT is not set"))?
            .parse::<u16>()
            .map_err(|_| AppError::config("SMTP_PORT must be a valid port number"))?;

        Ok(Self {
            api_key,
            city,
            email_from,
            email_to,
            smtp_server,
            smtp_port,
            smtp_user: get("SMTP_USER"),
            smtp_password: get("SMTP_PASSWORD"),
            wind_gust_threshold: parse_threshold(lookup("WIND_GUST_THRESHOLD").as_deref()),
            notification_hour: parse_time_component(
                "NOTIFICATION_HOUR",
                lookup("NOTIFICATION_HOUR").as_deref(),
                24,
                DEFAULT_NOTIFICATION_HOUR,
            ),
            notification_min: parse_time_component(
                "NOTIFICATION_MIN",
                lookup("NOTIFICATION_MIN").as_deref(),
                60,
                DEFAULT_NOTIFICATION_MIN,
            ),
            http_retries: parse_retry_budget(lookup("HTTP_RETRIES").as_deref()),
            geocoding_url: lookup("GEOCODING_URL")
                .filter(|url| !url.is_empty())
                .unwrap_or_else(|| DEFAULT_GEOCODING_URL.to_string()),
            forecast_url: lookup("FORECAST_URL")
                .filter(|url| !url.is_empty())
                .unwrap_or_else(|| DEFAULT_FORECAST_URL.to_string()),
        })
    }
}

/// Split a recipient list on `,` (or `;` when no comma is present), trim
/// each entry and drop empty ones.
fn parse_recipients(raw: &str) -> Vec<String> {
    let separator = if raw.contains(',') { ',' } else { ';' };

    raw.split(separator)
        .map(str::trim)
        .filter(|address| !address.is_empty())
        .map(String::from)
        .collect()
}

fn parse_threshold(raw: Option<&str>) -> f64 {
    match raw {
        None | Some("") => DEFAULT_WIND_GUST_THRESHOLD,
        Some(value) => match value.parse() {
            Ok(threshold) => threshold,
            Err(_) => {
                warn!(value, "Invalid WIND_GUST_THRESHOLD, using default");
                DEFAULT_WIND_GUST_THRESHOLD
            }
        },
    }
}

fn parse_time_component(name: &str, raw: Option<&str>, limit: u32, default: u32) -> u32 {
    match raw {
        None | Some("") => default,
        Some(value) => match value.parse::<u32>() {
            Ok(component) if component < limit => component,
            _ => {
                warn!(name, value, "Invalid notification time component, using default");
                default
            }
        },
    }
}

fn parse_retry_budget(raw: Option<&str>) -> u32 {
    match raw {
        None | Some("") => DEFAULT_HTTP_RETRIES,
        Some(value) => match value.parse() {
            Ok(retries) => retries,
            Err(_) => {
                warn!(value, "Invalid HTTP_RETRIES, using default");
                DEFAULT_HTTP_RETRIES
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup_from<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |name| {
            pairs
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| value.to_string())
        }
    }

    fn base_env() -> Vec<(&'static str, &'static str)> {
        vec![
            ("OPENWEATHER_API_KEY", "key"),
            ("CITY", "London"),
            ("EMAIL_FROM", "alerts@example.com"),
            ("EMAIL_TO", "a@x.com"),
            ("SMTP_SERVER", "smtp.example.com"),
            ("SMTP_PORT", "587"),
        ]
    }

    #[test]
    fn loads_a_complete_environment_with_defaults() {
        let pairs = base_env();
        let config = Config::from_lookup(lookup_from(&pairs)).expect("load failed");

        assert_eq!(config.city, "London");
        assert_eq!(config.smtp_port, 587);
        assert_eq!(config.email_to, vec!["a@x.com".to_string()]);
        assert_eq!(config.wind_gust_threshold, DEFAULT_WIND_GUST_THRESHOLD);
        assert_eq!(config.notification_hour, DEFAULT_NOTIFICATION_HOUR);
        assert_eq!(config.notification_min, DEFAULT_NOTIFICATION_MIN);
        assert_eq!(config.http_retries, DEFAULT_HTTP_RETRIES);
        assert_eq!(config.geocoding_url, DEFAULT_GEOCODING_URL);
        assert_eq!(config.forecast_url, DEFAULT_FORECAST_URL);
    }

    #[test]
    fn each_missing_required_field_is_fatal() {
        let required = [
            "OPENWEATHER_API_KEY",
            "CITY",
            "EMAIL_FROM",
            "EMAIL_TO",
            "SMTP_SERVER",
            "SMTP_PORT",
        ];

        for missing in required {
            let pairs: Vec<_> = base_env()
                .into_iter()
                .filter(|(key, _)| *key != missing)
                .collect();

            let err = Config::from_lookup(lookup_from(&pairs)).unwrap_err();
            assert!(
                matches!(err, AppError::ConfigError(_)),
                "expected ConfigError when {} is missing",
                missing
            );
        }
    }

    #[test]
    fn empty_required_field_is_fatal() {
        let mut pairs = base_env();
        pairs.retain(|(key, _)| *key != "EMAIL_TO");
        pairs.push(("EMAIL_TO", "  ,  "));

        let err = Config::from_lookup(lookup_from(&pairs)).unwrap_err();
        assert!(matches!(err, AppError::ConfigError(_)));
    }

    #[test]
    fn non_numeric_port_is_fatal() {
        let mut pairs = base_env();
        pairs.retain(|(key, _)| *key != "SMTP_PORT");
        pairs.push(("SMTP_PORT", "not-a-port"));

        let err = Config::from_lookup(lookup_from(&pairs)).unwrap_err();
        assert!(matches!(err, AppError::ConfigError(_)));
    }

    #[test]
    fn optional_overrides_apply() {
        let mut pairs = base_env();
        pairs.push(("WIND_GUST_THRESHOLD", "20.5"));
        pairs.push(("NOTIFICATION_HOUR", "7"));
        pairs.push(("NOTIFICATION_MIN", "30"));
        pairs.push(("HTTP_RETRIES", "2"));
        pairs.push(("GEOCODING_URL", "http://localhost:9000/geo"));

        let config = Config::from_lookup(lookup_from(&pairs)).expect("load failed");

        assert_eq!(config.wind_gust_threshold, 20.5);
        assert_eq!(config.notification_hour, 7);
        assert_eq!(config.notification_min, 30);
        assert_eq!(config.http_retries, 2);
        assert_eq!(config.geocoding_url, "http://localhost:9000/geo");
        assert_eq!(config.forecast_url, DEFAULT_FORECAST_URL);
    }

    #[test]
    fn recipients_split_on_comma() {
        assert_eq!(
            parse_recipients("a@x.com, b@x.com"),
            vec!["a@x.com".to_string(), "b@x.com".to_string()]
        );
    }

    #[test]
    fn recipients_split_on_semicolon() {
        assert_eq!(
            parse_recipients("a@x.com; b@x.com"),
            vec!["a@x.com".to_string(), "b@x.com".to_string()]
        );
    }

    #[test]
    fn recipients_drop_empty_entries() {
        assert_eq!(parse_recipients("a@x.com,,  "), vec!["a@x.com".to_string()]);
    }

    #[test]
    fn recipients_empty_input() {
        assert!(parse_recipients("").is_empty());
        assert!(parse_recipients("  ,  ").is_empty());
    }

    #[test]
    fn single_recipient_without_separator() {
        assert_eq!(parse_recipients("a@x.com"), vec!["a@x.com".to_string()]);
    }

    #[test]
    fn threshold_parses_or_defaults() {
        assert_eq!(parse_threshold(Some("20.5")), 20.5);
        assert_eq!(parse_threshold(Some("garbage")), DEFAULT_WIND_GUST_THRESHOLD);
        assert_eq!(parse_threshold(None), DEFAULT_WIND_GUST_THRESHOLD);
        assert_eq!(parse_threshold(Some("")), DEFAULT_WIND_GUST_THRESHOLD);
    }

    #[test]
    fn time_components_validate_ranges() {
        assert_eq!(parse_time_component("NOTIFICATION_HOUR", Some("7"), 24, 9), 7);
        assert_eq!(parse_time_component("NOTIFICATION_HOUR", Some("24"), 24, 9), 9);
        assert_eq!(parse_time_component("NOTIFICATION_HOUR", Some("-1"), 24, 9), 9);
        assert_eq!(parse_time_component("NOTIFICATION_MIN", Some("59"), 60, 0), 59);
        assert_eq!(parse_time_component("NOTIFICATION_MIN", Some("60"), 60, 0), 0);
        assert_eq!(parse_time_component("NOTIFICATION_MIN", None, 60, 0), 0);
    }

    #[test]
    fn retry_budget_parses_or_defaults() {
        assert_eq!(parse_retry_budget(Some("3")), 3);
        assert_eq!(parse_retry_budget(Some("-1")), DEFAULT_HTTP_RETRIES);
        assert_eq!(parse_retry_budget(None), DEFAULT_HTTP_RETRIES);
    }
}
