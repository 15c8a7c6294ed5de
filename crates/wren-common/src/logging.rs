//! Logging setup shared by the binaries.
//!
//! Libraries only emit `tracing` events; whoever owns `main` calls
//! [`init_logging`] once to install a subscriber.

use tracing_subscriber::EnvFilter;

/// Install a `fmt` subscriber writing to stderr.
///
/// `RUST_LOG` wins when set. Otherwise the level is derived from
/// `verbosity`: 0 shows warnings, 1 adds debug output from the wren crates,
/// 2 or more enables tracing of every insertion-mode transition.
///
/// Calling this twice is harmless; the second install is ignored.
pub fn init_logging(verbosity: u8) {
    let fallback = match verbosity {
        0 => "warn",
        1 => "warn,wren_arena=debug,wren_html=debug,wren_dom=debug",
        _ => "warn,wren_arena=trace,wren_html=trace,wren_dom=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
