pub mod errors;
pub mod http_client;
pub mod tracing;
