//! Stderr diagnostics for the CLI.
//!
//! Derived output (CSV rows, JSON values, status lines) is printed to stdout;
//! everything emitted through `tracing` lands here instead, so piping an
//! export never mixes in log lines.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs the global subscriber. `RUST_LOG` overrides the `warn` default,
/// e.g. `RUST_LOG=gradebook_views=debug` to see snapshot loading.
pub fn init() {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();
}
