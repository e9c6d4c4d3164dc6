/// Galaxy3D Engine - process-wide logging hub
///
/// Partitions are plain values owned by the host world; the only global
/// state is the logger slot used by the `engine_*!` macros.

use std::sync::{OnceLock, RwLock};
use std::time::SystemTime;
use crate::error::Error;
use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};

/// Global logger (initialized with DefaultLogger)
static LOGGER: OnceLock<RwLock<Box<dyn Logger>>> = OnceLock::new();

fn logger_slot() -> &'static RwLock<Box<dyn Logger>> {
    LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger::new())))
}

/// Entry point for engine-wide services.
pub struct Engine;

impl Engine {
    /// Log an error with its source before handing it back to the caller.
    ///
    /// Used on the construction paths so that rejected configurations
    /// show up in the log even when the caller discards the `Result`.
    pub(crate) fn log_and_return_error(source: &str, error: Error) -> Error {
        match &error {
            Error::InvalidConfig(msg) => {
                crate::engine_error!(source, "Invalid configuration: {}", msg);
            }
        }
        error
    }

    // ===== LOGGING API =====

    /// Set a custom logger
    ///
    /// # Example
    ///
    /// ```no_run
    /// use galaxy_3d_partition::galaxy3d::{Engine, log::{Logger, LogEntry}};
    ///
    /// struct ConsoleOverlay;
    /// impl Logger for ConsoleOverlay {
    ///     fn log(&self, entry: &LogEntry) {
    ///         // Push to the in-game console...
    ///     }
    /// }
    ///
    /// Engine::set_logger(ConsoleOverlay);
    /// ```
    pub fn set_logger<L: Logger + 'static>(logger: L) {
        if let Ok(mut lock) = logger_slot().write() {
            *lock = Box::new(logger);
        }
    }

    /// Reset logger to default (DefaultLogger, Info and above)
    pub fn reset_logger() {
        if let Ok(mut lock) = logger_slot().write() {
            *lock = Box::new(DefaultLogger::new());
        }
    }

    /// Internal logging method (for simple logs without file:line)
    ///
    /// Used by macros like engine_debug!, engine_warn!, etc.
    pub fn log(severity: LogSeverity, source: &str, message: String) {
        if let Ok(lock) = logger_slot().read() {
            lock.log(&LogEntry {
                severity,
                timestamp: SystemTime::now(),
                source: source.to_string(),
                message,
                file: None,
                line: None,
            });
        }
    }

    /// Internal logging method with file:line information (for ERROR logs)
    ///
    /// Used by engine_error! macro to include source location.
    pub fn log_detailed(
        severity: LogSeverity,
        source: &str,
        message: String,
        file: &'static str,
        line: u32,
    ) {
        if let Ok(lock) = logger_slot().read() {
            lock.log(&LogEntry {
                severity,
                timestamp: SystemTime::now(),
                source: source.to_string(),
                message,
                file: Some(file),
                line: Some(line),
            });
        }
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
