//! Tracing setup for binaries and tests embedding the engine.
//!
//! The library itself only emits `tracing` events; nothing here runs
//! unless a host calls [`init`]. Filtering follows `RUST_LOG`, defaulting
//! to `stepweave=info`, and span context is captured for miette reports
//! via `tracing-error`.
//!
//! # Examples
//!
//! ```rust,no_run
//! stepweave::telemetry::init();
//! tracing::info!("engine ready");
//! ```

use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_DIRECTIVES: &str = "stepweave=info";

fn env_filter(default_directives: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives))
}

/// Installs the global subscriber: fmt output to stderr, `RUST_LOG`
/// filtering, and span capture for error reports.
///
/// Safe to call more than once; later calls are no-ops.
pub fn init() {
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(env_filter(DEFAULT_DIRECTIVES))
        .with(ErrorLayer::default())
        .try_init();
}

/// Subscriber for tests: debug-level by default, writing through the
/// test harness capture so passing tests stay quiet.
///
/// Call at the top of a test that needs trace output; repeated calls are
/// no-ops.
pub fn init_test() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_test_writer(),
        )
        .with(env_filter("stepweave=debug"))
        .with(ErrorLayer::default())
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent() {
        init_test();
        init_test();
        init();
        tracing::debug!("still alive");
    }
}
