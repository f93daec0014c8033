//! Logging for the `consult` binary: colored records on stderr, plain records
//! in `consult.log`. Stdout carries only consultation output.

use crate::error::ConsultError;

use common::ErrorLocation;

use std::fmt;
use std::io::stderr;
use std::panic::Location;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::SystemTime;

use fern::colors::{Color, ColoredLevelConfig};
use fern::{Dispatch, FormatCallback};
use humantime::format_rfc3339;
use log::{LevelFilter, Record, debug, warn};

static STARTED: AtomicBool = AtomicBool::new(false);

pub const LOG_FILE_NAME: &str = "consult.log";

/// Crates whose records pass at the chosen level; everything else needs Warn.
const OWN_TARGETS: [&str; 2] = ["expert_core", "consult"];

/// Debug builds and `--verbose` log at Debug, release builds at Info.
pub fn level_for(verbose: bool) -> LevelFilter {
    if verbose || cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Install the global logger once. Later calls warn and return `Ok`.
///
/// # Errors
/// Returns [`ConsultError`] if `consult.log` cannot be opened in `log_dir`
/// or another logger is already installed.
pub fn initialize(log_dir: &Path, verbose: bool) -> Result<(), ConsultError> {
    if STARTED.swap(true, Ordering::SeqCst) {
        warn!("Logger already initialized, ignoring {}", log_dir.display());
        return Ok(());
    }

    let level = level_for(verbose);
    initialize_internal(log_dir, level)?;
    debug!("Logging at {level} to {}", log_dir.join(LOG_FILE_NAME).display());

    Ok(())
}

#[track_caller]
pub(crate) fn initialize_internal(log_dir: &Path, level: LevelFilter) -> Result<(), ConsultError> {
    let location = ErrorLocation::from(Location::caller());

    let log_file = fern::log_file(log_dir.join(LOG_FILE_NAME)).map_err(|e| ConsultError::Consult {
        message: format!("Failed to create log file in {}: {e}", log_dir.display()),
        location,
    })?;

    let colors = ColoredLevelConfig::new()
        .trace(Color::Magenta)
        .debug(Color::Blue)
        .info(Color::Green)
        .warn(Color::Yellow)
        .error(Color::Red);

    let terminal = Dispatch::new()
        .format(move |out, message, record| {
            write_record(out, message, record, colors.color(record.level()))
        })
        .chain(stderr());

    let file = Dispatch::new()
        .format(|out, message, record| write_record(out, message, record, record.level()))
        .chain(log_file);

    OWN_TARGETS
        .iter()
        .fold(Dispatch::new().level(LevelFilter::Warn), |dispatch, target| {
            dispatch.level_for(*target, level)
        })
        .chain(terminal)
        .chain(file)
        .apply()
        .map_err(|e| ConsultError::Consult {
            message: format!("Failed to initialize logger: {e}"),
            location,
        })
}

fn write_record(
    out: FormatCallback,
    message: &fmt::Arguments,
    record: &Record,
    level: impl fmt::Display,
) {
    out.finish(format_args!(
        "[{} - {level}] {message} [{}:{}]",
        format_rfc3339(SystemTime::now()),
        record.file().unwrap_or("unknown"),
        record.line().unwrap_or(0),
    ))
}
