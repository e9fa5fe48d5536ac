//! Logging Infrastructure
//!
//! `RUST_LOG` wins when set; otherwise the configured level applies.
//! Production writes JSON lines, other environments the plain format.

use std::path::Path;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

/// Initialize the global logger with optional daily-rolling file output.
///
/// File output is used only when `log_dir` exists. Panics if a global
/// subscriber is already installed.
pub fn init_logger_with_file(log_level: Option<&str>, json: Option<bool>, log_dir: Option<&str>) {
    let level = log_level.unwrap_or("info");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let file_dir = log_dir.map(Path::new).filter(|p| p.exists());
    let writer = match file_dir {
        Some(dir) => BoxMakeWriter::new(tracing_appender::rolling::daily(dir, "tiffin-ledger")),
        None => BoxMakeWriter::new(std::io::stdout),
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(true)
        .with_ansi(file_dir.is_none())
        .with_writer(writer);

    if json.unwrap_or(false) {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}
