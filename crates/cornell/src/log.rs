//! Logging for the cornell assistant.
use crate::cli::ux::with_spinner_suspended;
use anyhow::Context;
use cornell_core::get_data_dir;
use std::fs::File;
use std::io::{self, LineWriter, Write};
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::fmt::time::OffsetTime;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

/// Diagnostics on stderr. Overridden by `RUST_LOG`.
const STDERR_FILTER: &str = "cornell=error,cornell_core=error";
const FILE_FILTER: &str = "cornell=debug,cornell_core=debug,rustyline=info";
const MAX_LOG_SIZE: u64 = 100 * 1024;

/// Initializes the application's logging system.
///
/// Errors from the responder are always reported on stderr, the diagnostics
/// channel kept apart from the conversation on stdout. With `verbose`, debug
/// logs are additionally written to `<data_dir>/cornell.log`, which is moved
/// to `cornell.log.old` once it grows past 100KB.
///
/// # Errors
///
/// Returns an error if the data directory or log file cannot be prepared, or
/// if the local time offset cannot be determined.
pub fn setup_logging(verbose: bool) -> anyhow::Result<()> {
    let stderr_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(STDERR_FILTER));
    let stderr_layer = fmt::layer()
        .with_writer(SpinnerAwareStderr)
        .without_time()
        .with_target(false)
        .with_filter(stderr_filter);

    let file_layer = if verbose {
        let data_dir = get_data_dir().context("Failed to get data directory")?;
        let log_file = open_log_file(&data_dir)?;
        // Ensure the logs are flushed after every line
        let writer = Mutex::new(LineWriter::new(log_file));

        Some(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_timer(OffsetTime::local_rfc_3339()?)
                .with_filter(EnvFilter::new(FILE_FILTER)),
        )
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .init();
    Ok(())
}

/// Writes to stderr with the "Thinking..." spinner hidden, so log lines do
/// not land on top of spinner frames.
struct SpinnerAwareStderr;

impl<'a> MakeWriter<'a> for SpinnerAwareStderr {
    type Writer = SpinnerAwareStderr;

    fn make_writer(&'a self) -> Self::Writer {
        SpinnerAwareStderr
    }
}

impl Write for SpinnerAwareStderr {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        with_spinner_suspended(|| io::stderr().write(buf))
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        with_spinner_suspended(|| io::stderr().write_all(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()
    }
}

fn open_log_file(data_dir: &Path) -> anyhow::Result<File> {
    let log_path = data_dir.join("cornell.log");

    if log_path.exists() {
        let metadata = std::fs::metadata(&log_path)?;
        if metadata.len() > MAX_LOG_SIZE {
            let backup_path = data_dir.join("cornell.log.old");
            if backup_path.exists() {
                std::fs::remove_file(&backup_path)?;
            }
            std::fs::rename(&log_path, backup_path)?;
        }
    }

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .context("Failed to open log file")?;
    Ok(log_file)
}
