use chrono::Local;
use tracing::{error, info, warn};

use crate::api_client::OpenWeatherClient;
use crate::composer::{self, ALERT_SUBJECT};
use crate::config::Config;
use crate::evaluator;
use crate::mailer::AlertMailer;

/// One full check cycle. Every failure is terminal for the cycle: log it
/// and let the next scheduled run be the retry.
pub async fn check_and_alert(config: &Config, client: &OpenWeatherClient, mailer: &AlertMailer) {
    info!(city = %config.city, "Running wind gust check");

    let location = match client.resolve_coordinates(&config.city).await {
        Ok(location) => location,
        Err(e) => {
            warn!(error = %e, "Failed to resolve city coordinates");
            return;
        }
    };

    let points = match client.fetch_forecast(location.lat, location.lon).await {
        Ok(points) => points,
        Err(e) => {
            warn!(error = %e, "Failed to fetch forecast");
            return;
        }
    };

    if points.is_empty() {
        warn!("Forecast response contained no data points");
        return;
    }

    let evaluation = evaluator::evaluate(&points, config.wind_gust_threshold, Local::now());

    if !evaluation.exceeds {
        info!(
            threshold = config.wind_gust_threshold,
            "Wind gusts within threshold for the day, no alert needed"
        );
        return;
    }

    info!(
        max_gust = evaluation.max_gust,
        qualifying = evaluation.qualifying.len(),
        "Wind gusts exceed the threshold, sending alert"
    );

    let content = match composer::compose_alert(
        evaluation.max_gust,
        config.wind_gust_threshold,
        &evaluation.qualifying,
    ) {
        Ok(content) => content,
        Err(e) => {
            error!(error = %e, "Failed to compose alert email");
            return;
        }
    };

    match mailer.send(ALERT_SUBJECT, &content).await {
        Ok(()) => info!("Alert sent successfully"),
        Err(e) => error!(error = %e, "Failed to send alert"),
    }
}
