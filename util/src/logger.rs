//! Logger initialisation
//!
//! All crates log through the `log` facade. The executable installs a `fern`
//! dispatcher once at startup which prints to stdout and, when a session is
//! active, mirrors everything into the session's log file.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External imports
use log::{self, info};
use fern;
use colored::{ColoredString, Colorize};
use std::str::FromStr;
use thiserror::Error;

// Internal imports
use crate::session;

// Re-exports
pub use log::LevelFilter;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors associated with initialising the logger.
#[derive(Debug, Error)]
pub enum LoggerInitError {
    #[error("Expected a log level of at least `INFO`, found `{0}`")]
    InvalidMinLogLevel(log::LevelFilter),

    #[error("Unrecognised log level \"{0}\"")]
    UnknownLogLevel(String),

    #[error("Error initialising the log file: {0}")]
    LogFileInitError(std::io::Error),

    #[error("An error occured while setting up the logger: {0}")]
    FernInitError(log::SetLoggerError)
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Parse a log level from a command line string (`info`, `debug`, `trace`).
///
/// Levels quieter than `info` are rejected since the executable relies on
/// `info` to report the rollout outcome.
pub fn parse_level(level: &str) -> Result<LevelFilter, LoggerInitError> {
    let filter = LevelFilter::from_str(level)
        .map_err(|_| LoggerInitError::UnknownLogLevel(String::from(level)))?;

    if filter < log::Level::Info {
        return Err(LoggerInitError::InvalidMinLogLevel(filter))
    }

    Ok(filter)
}

/// Initialise the logger for this execution.
///
/// If `session` is `None` only stdout is logged to.
///
/// # Notes
///
/// - `min_level` must be at least `log::Level::Info`.
///
/// # Safety
///
/// - This function must only be called once to prevent corrupting logs.
pub fn logger_init(
    min_level: self::LevelFilter,
    session: Option<&session::Session>
) -> Result<(), LoggerInitError> {

    if min_level < log::Level::Info {
        return Err(LoggerInitError::InvalidMinLogLevel(min_level))
    }

    // Setup the logger using fern's builder pattern
    let mut dispatch = fern::Dispatch::new()
        .format(|out, message, record| {
            let elapsed_s = session::try_get_elapsed_seconds().unwrap_or(0.0);

            // If debug or trace include the target, otherwise don't include it
            if record.level() > log::Level::Info {
                out.finish(format_args!(
                    "[{:10.6} {}] {}: {}",
                    elapsed_s,
                    level_to_str(record.level()),
                    record.target(),
                    message
                ))
            }
            else {
                out.finish(format_args!(
                    "[{:10.6} {}] {}",
                    elapsed_s,
                    level_to_str(record.level()),
                    message
                ))
            }
        })
        .level(min_level)
        .chain(std::io::stdout());

    if let Some(s) = session {
        dispatch = dispatch.chain(
            fern::log_file(s.log_file_path.clone())
                .map_err(LoggerInitError::LogFileInitError)?
        );
    }

    dispatch.apply().map_err(LoggerInitError::FernInitError)?;

    info!("Logging initialised");
    info!("    Log level: {:?}", min_level);
    match session {
        Some(s) => {
            info!("    Session epoch: {}", session::get_epoch());
            info!("    Log file path: {:?}", s.log_file_path);
        },
        None => info!("    No session, logging to stdout only")
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Get the string representation of a log level
fn level_to_str(level: log::Level) -> ColoredString {
    match level {
        log::Level::Trace => "TRC".dimmed().italic(),
        log::Level::Debug => "DBG".dimmed(),
        log::Level::Info  => "INF".normal(),
        log::Level::Warn  => "WRN".yellow(),
        log::Level::Error => "ERR".red().bold()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("info").unwrap(), LevelFilter::Info);
        assert_eq!(parse_level("TRACE").unwrap(), LevelFilter::Trace);

        match parse_level("warn") {
            Err(LoggerInitError::InvalidMinLogLevel(LevelFilter::Warn)) => (),
            r => panic!("Expected an invalid level error, got {:?}", r)
        }
        match parse_level("loud") {
            Err(LoggerInitError::UnknownLogLevel(_)) => (),
            r => panic!("Expected an unknown level error, got {:?}", r)
        }
    }
}
