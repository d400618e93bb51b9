use chrono::{DateTime, Datelike, Duration, Local, TimeZone};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::api_client::OpenWeatherClient;
use crate::checker;
use crate::config::Config;
use crate::mailer::AlertMailer;

/// Width of the startup catch-up window. A restart inside this window after
/// the scheduled slot still triggers a same-day check. Tunable heuristic.
pub const CATCH_UP_WINDOW_MINUTES: i64 = 5;

/// Next occurrence of the configured notification time, rolling to tomorrow
/// when today's slot has already passed.
pub fn next_send_time(now: DateTime<Local>, hour: u32, minute: u32) -> DateTime<Local> {
    let next = at_local_time(now, hour, minute);
    if next <= now {
        next + Duration::hours(24)
    } else {
        next
    }
}

/// True when `now` lies in `[scheduled, scheduled + catch-up window)` for
/// today's notification slot.
pub fn within_catch_up_window(now: DateTime<Local>, hour: u32, minute: u32) -> bool {
    let scheduled = at_local_time(now, hour, minute);
    now >= scheduled && now - scheduled < Duration::minutes(CATCH_UP_WINDOW_MINUTES)
}

fn at_local_time(now: DateTime<Local>, hour: u32, minute: u32) -> DateTime<Local> {
    Local
        .with_ymd_and_hms(now.year(), now.month(), now.day(), hour, minute, 0)
        .earliest()
        .unwrap_or(now)
}

/// Check-then-sleep loop. One check per day at the configured time, strictly
/// sequential cycles, cancellable mid-sleep so shutdown never waits out a
/// multi-hour sleep.
pub async fn run(
    config: &Config,
    client: &OpenWeatherClient,
    mailer: &AlertMailer,
    cancellation_token: CancellationToken,
) {
    if within_catch_up_window(Local::now(), config.notification_hour, config.notification_min) {
        info!("Within the catch-up window, running an immediate check");
        checker::check_and_alert(config, client, mailer).await;
    } else {
        info!(
            "First check will run at {:02}:{:02}",
            config.notification_hour, config.notification_min
        );
    }

    loop {
        let now = Local::now();
        let next = next_send_time(now, config.notification_hour, config.notification_min);
        let wait = (next - now).to_std().unwrap_or(std::time::Duration::ZERO);

        info!(
            next = %next.format("%Y-%m-%d %H:%M:%S"),
            wait_secs = wait.as_secs(),
            "Next check scheduled"
        );

        tokio::select! {
            _ = tokio::time::sleep(wait) => {
                checker::check_and_alert(config, client, mailer).await;
            }
            _ = cancellation_token.cancelled() => {
                info!("Shutdown requested, leaving scheduler loop");
                return;
            }
        }
    }
}
