//! Tracing initialization and configuration.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Environment variable holding the filter directives.
pub const LOG_ENV: &str = "PERFWATCH_LOG";

/// Initialize the perfwatch tracing/logging system.
///
/// Reads `PERFWATCH_LOG` for per-crate log levels.
/// Format: `PERFWATCH_LOG=perfwatch_bench=debug,perfwatch_storage=warn`
///
/// Falls back to `perfwatch=info` if `PERFWATCH_LOG` is not set or invalid.
/// Output goes to stderr so rendered reports on stdout stay machine-readable.
///
/// Idempotent: only the first call installs the subscriber.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV)
            .unwrap_or_else(|_| EnvFilter::new("perfwatch=info"));

        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .with(filter)
            .init();
    });
}
