//! Diagnostic tracing on stderr.
//!
//! Progress lines on stdout are product output and are not affected by
//! `RUST_LOG`. This module only covers diagnostics.

use std::io::IsTerminal;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` wins when set. Otherwise the level is `warn`, or
/// `redact_batch=debug` when `verbose` is true.
///
/// # Example
/// ```bash
/// RUST_LOG=redact_batch=info redact_batch ./in ./out
/// ```
pub fn init(verbose: bool) {
    let fallback = if verbose { "warn,redact_batch=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(std::io::stderr().is_terminal())
                .compact(),
        )
        .try_init();
}
