//! Logging setup shared by the binaries.
//!
//! Library code only emits `tracing` events; installing a subscriber is left
//! to the entry points. Output goes to stderr so stdout stays free for the
//! protocol.

use std::io::IsTerminal;

use tracing::subscriber::{set_global_default, SetGlobalDefaultError};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Installs a global stderr subscriber at `level`.
pub fn init_logger(level: Level) -> Result<(), SetGlobalDefaultError> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    set_global_default(subscriber)
}
