//! Structured logging configuration.
//!
//! The `tournaments` library logs through the `log` facade; those records
//! reach the subscriber installed here through the `tracing-log` bridge.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize structured logging
///
/// Log levels are configurable via the `RUST_LOG` env var.
///
/// # Example
///
/// ```no_run
/// use tournaments_server::logging;
///
/// #[tokio::main]
/// async fn main() {
///     logging::init();
///     tracing::info!("Server starting");
/// }
/// ```
pub fn init() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn,hyper=warn"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    tracing::info!("Structured logging initialized");
}

/// Log a request the registries refused
///
/// Server-side failures go out at `error`, client mistakes at `warn`.
pub fn log_rejected_request(request_id: &str, status_code: u16, kind: &str, detail: &str) {
    if status_code >= 500 {
        tracing::error!(
            request_id = %request_id,
            http_status = status_code,
            error_kind = kind,
            "Request failed: {}",
            detail
        );
    } else {
        tracing::warn!(
            request_id = %request_id,
            http_status = status_code,
            error_kind = kind,
            "Request rejected: {}",
            detail
        );
    }
}
