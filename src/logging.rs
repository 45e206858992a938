//! File logging
//!
//! The terminal belongs to the UI, so tracing output goes to
//! `~/.lunar-tui/lunar-tui.log`. `RUST_LOG` overrides the level picked by
//! `-v` flags.

use anyhow::Result;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const LOG_FILE_NAME: &str = "lunar-tui.log";

/// Level directive for the number of `-v` flags
pub fn level_for_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber writing to `dir/lunar-tui.log`
///
/// The returned guard flushes the writer when dropped; keep it alive for
/// the lifetime of the program.
pub fn init(dir: &Path, verbose: u8) -> Result<(WorkerGuard, PathBuf)> {
    fs::create_dir_all(dir)?;
    let path = dir.join(LOG_FILE_NAME);
    let file = File::create(&path)?;
    let (writer, guard) = tracing_appender::non_blocking(file);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_for_verbosity(verbose)));

    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_line_number(true)
        .with_writer(writer);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .try_init()?;

    Ok((guard, path))
}
