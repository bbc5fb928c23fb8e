//! Subscriber setup for binaries and test harnesses embedding the relation store.

use tracing_subscriber::{fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "info,junction=debug";

/// Install a fmt subscriber filtered by `RUST_LOG` (default `info,junction=debug`).
///
/// Relation spans are logged on close so each operation shows its duration. Calling this
/// more than once is harmless; later calls leave the first subscriber in place.
pub fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let result = tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_span_events(FmtSpan::CLOSE),
        )
        .try_init();

    if result.is_err() {
        tracing::debug!("Tracing already initialized, skipping");
    }
}
