//! Tracing subscriber setup.

use std::env;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

/// Environment variable holding a tracing filter directive.
pub const LOG_ENV: &str = "SIFTER_LOG";

/// Filter used when `SIFTER_LOG` is unset, raised by repeated `-v`.
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install a stderr subscriber. Explicit `-v` flags win over `SIFTER_LOG`.
pub fn init(verbosity: u8) {
    let filter = match env::var(LOG_ENV) {
        Ok(directive) if verbosity == 0 => {
            EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new(default_directive(0)))
        }
        _ => EnvFilter::new(default_directive(verbosity)),
    };

    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .with(filter)
        .try_init();
}
