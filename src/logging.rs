//! Diagnostic logging setup

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Environment variable holding filter directives, e.g. `stackup=trace`
pub const LOG_ENV: &str = "STACKUP_LOG";

fn default_directives(verbose: bool) -> &'static str {
    if verbose { "warn,stackup=debug" } else { "warn" }
}

/// Build the filter, preferring `STACKUP_LOG` when it parses
pub fn filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)))
}

/// Install the global subscriber; later calls are no-ops
pub fn init(verbose: bool) {
    let _ = tracing_subscriber::registry()
        .with(filter(verbose))
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .try_init();
}
