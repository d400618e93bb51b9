//! Daily wind-gust monitoring: resolve the configured city to coordinates,
//! fetch the forecast, scan the daytime window against the gust threshold,
//! and email a warning when it is exceeded.

pub mod api_client;
pub mod checker;
pub mod composer;
pub mod config;
pub mod evaluator;
pub mod mailer;
pub mod models;
pub mod scheduler;
