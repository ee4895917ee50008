//! Tracing setup for the `changeset` binary.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialise the global tracing subscriber, logging to stderr.
///
/// `RUST_LOG` takes precedence; otherwise only warnings are shown, or
/// debug output for this crate when `verbose` is set.
/// Only the first call in a process takes effect.
pub fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "changesets=debug" } else { "warn" };
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .try_init()
        .ok();
}
