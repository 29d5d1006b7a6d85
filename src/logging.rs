//! Tracing subscriber setup for the binary
//!
//! The library only emits `tracing` events; installing a subscriber is the
//! driver's job. Output goes to stderr so stdout stays clean for results and JSON.

use tracing_subscriber::EnvFilter;

/// Install a stderr fmt subscriber.
///
/// `RUST_LOG` wins when set. Otherwise only warnings are shown, or debug output from
/// this crate with `verbose`. Calling it twice is harmless.
pub fn init_logging(verbose: bool) {
    let default_directive = if verbose { "warn,ai_prompt_history=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
