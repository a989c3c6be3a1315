//! Tracing initialization for binaries embedding the service.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initializes the global tracing subscriber with env-filter support.
///
/// Honors `RUST_LOG`; defaults to debug for this workspace and info
/// elsewhere. Calling it twice is a no-op (the second registration fails
/// silently), which keeps tests safe.
pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fintune=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
