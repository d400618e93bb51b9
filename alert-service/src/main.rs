use alert_service::api_client::OpenWeatherClient;
use alert_service::config::Config;
use alert_service::mailer::AlertMailer;
use alert_service::scheduler;
use common::tracing::init_tracing_pretty;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    init_tracing_pretty();
    dotenvy::dotenv().ok();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Failed to load configuration");
            std::process::exit(1);
        }
    };

    info!(
        threshold = config.wind_gust_threshold,
        hour = config.notification_hour,
        minute = config.notification_min,
        "Wind gust monitoring service starting"
    );

    let mailer = match AlertMailer::from_config(&config) {
        Ok(mailer) => mailer,
        Err(e) => {
            error!(error = %e, "Failed to set up SMTP mailer");
            std::process::exit(1);
        }
    };

    let client = OpenWeatherClient::new(
        config.api_key.clone(),
        config.geocoding_url.clone(),
        config.forecast_url.clone(),
        config.http_retries,
    );

    let cancellation_token = CancellationToken::new();
    tokio::spawn(shutdown_signal(cancellation_token.clone()));

    scheduler::run(&config, &client, &mailer, cancellation_token).await;

    info!("Wind gust monitoring service stopped");
}

async fn shutdown_signal(cancellation_token: CancellationToken) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received SIGINT, starting graceful shutdown...");
        },
        _ = terminate => {
            info!("Received SIGTERM, starting graceful shutdown...");
        },
    }

    // Abandon the pending sleep so shutdown is immediate
    cancellation_token.cancel();
    warn!("Cancelled pending wait, shutting down gracefully...");
}
