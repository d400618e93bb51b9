use askama::Template;
use common::errors::AppError;

use crate::models::WindGustForecast;

pub const ALERT_SUBJECT: &str = "WARNING: Strong wind expected today";

/// More qualifying points than this collapses the hour breakdown into a
/// single "all day" notice. A readability cutoff, not a correctness rule.
pub const ALL_DAY_CUTOFF: usize = 6;

/// Rendered alert bodies: HTML primary with a plain-text alternative
#[derive(Debug, Clone)]
pub struct EmailContent {
    pub html: String,
    pub text: String,
}

#[derive(Template)]
#[template(path = "alert.html")]
struct HtmlAlert<'a> {
    max_gust: &'a str,
    threshold: &'a str,
    hours: &'a str,
}

#[derive(Template)]
#[template(path = "alert.txt")]
struct TextAlert<'a> {
    max_gust: &'a str,
    threshold: &'a str,
    hours: &'a str,
}

/// Render both alert bodies. Values are formatted to exactly two decimals
/// so 15.0 renders as "15.00".
pub fn compose_alert(
    max_gust: f64,
    threshold: f64,
    qualifying: &[WindGustForecast],
) -> Result<EmailContent, AppError> {
    let max_gust = format!("{:.2}", max_gust);
    let threshold = format!("{:.2}", threshold);
    let hours = hours_summary(qualifying);

    let html = HtmlAlert {
        max_gust: &max_gust,
        threshold: &threshold,
        hours: &hours,
    }
    .render()
    .map_err(|e| AppError::compose(format!("HTML template: {}", e)))?;

    let text = TextAlert {
        max_gust: &max_gust,
        threshold: &threshold,
        hours: &hours,
    }
    .render()
    .map_err(|e| AppError::compose(format!("text template: {}", e)))?;

    Ok(EmailContent { html, text })
}

/// Hour-of-day breakdown of the qualifying points, collapsed past the cutoff
fn hours_summary(qualifying: &[WindGustForecast]) -> String {
    if qualifying.len() > ALL_DAY_CUTOFF {
        return "all day".to_string();
    }

    qualifying
        .iter()
        .map(|forecast| forecast.time.format("%H:%M").to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
