use tracing_subscriber::fmt::layer;
use tracing_subscriber::{EnvFilter, Registry, layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter keeps the SMTP library quiet unless explicitly requested.
const DEFAULT_FILTER: &str = "info,lettre=warn";

/// Initialize tracing with structured JSON output
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    Registry::default().with(filter).with(layer().json()).init();
}

/// Initialize tracing with pretty output for development
pub fn init_tracing_pretty() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
