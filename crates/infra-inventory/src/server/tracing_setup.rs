//! Tracing subscriber setup
//!
//! Configures the global tracing subscriber with console output (fmt layer)
//! filtered by `RUST_LOG`, falling back to [`DEFAULT_FILTER`].

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is unset or invalid
pub const DEFAULT_FILTER: &str = "info,infra_inventory=debug,infra_inventory_storage=debug";

/// Initialize tracing
///
/// Must be called once at startup before any tracing macros are used.
pub fn init() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    info!("Tracing initialized");
}
