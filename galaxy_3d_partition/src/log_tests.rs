//! Unit tests for log.rs
//!
//! Tests Logger trait, LogEntry, LogSeverity, and DefaultLogger filtering.

use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
use std::time::SystemTime;

fn entry(severity: LogSeverity, source: &str, message: &str) -> LogEntry {
    LogEntry {
        severity,
        timestamp: SystemTime::now(),
        source: source.to_string(),
        message: message.to_string(),
        file: None,
        line: None,
    }
}

// ============================================================================
// LOG SEVERITY TESTS
// ============================================================================

#[test]
fn test_log_severity_ordering() {
    assert!(LogSeverity::Trace < LogSeverity::Debug);
    assert!(LogSeverity::Debug < LogSeverity::Info);
    assert!(LogSeverity::Info < LogSeverity::Warn);
    assert!(LogSeverity::Warn < LogSeverity::Error);
}

#[test]
fn test_log_severity_labels_have_fixed_width() {
    for severity in [
        LogSeverity::Trace,
        LogSeverity::Debug,
        LogSeverity::Info,
        LogSeverity::Warn,
        LogSeverity::Error,
    ] {
        assert_eq!(severity.label().len(), 5);
    }
    assert_eq!(LogSeverity::Warn.label().trim(), "WARN");
}

// ============================================================================
// LOG ENTRY TESTS
// ============================================================================

#[test]
fn test_log_entry_with_file_line() {
    let entry = LogEntry {
        severity: LogSeverity::Error,
        timestamp: SystemTime::now(),
        source: "galaxy3d::Config".to_string(),
        message: "Rejected configuration".to_string(),
        file: Some("partition_manager.rs"),
        line: Some(42),
    };

    assert_eq!(entry.source, "galaxy3d::Config");
    assert_eq!(entry.file, Some("partition_manager.rs"));
    assert_eq!(entry.line, Some(42));

    let copy = entry.clone();
    assert_eq!(copy.message, entry.message);
    assert_eq!(copy.severity, LogSeverity::Error);
}

// ============================================================================
// DEFAULT LOGGER TESTS
// ============================================================================

#[test]
fn test_default_logger_filters_below_info() {
    let logger = DefaultLogger::new();
    assert_eq!(logger.min_severity(), LogSeverity::Info);
    assert!(!logger.accepts(LogSeverity::Trace));
    assert!(!logger.accepts(LogSeverity::Debug));
    assert!(logger.accepts(LogSeverity::Info));
    assert!(logger.accepts(LogSeverity::Error));
}

#[test]
fn test_default_logger_with_trace_accepts_everything() {
    let logger = DefaultLogger::with_min_severity(LogSeverity::Trace);
    assert!(logger.accepts(LogSeverity::Trace));
    assert!(logger.accepts(LogSeverity::Warn));
}

#[test]
fn test_default_logger_prints_all_severities() {
    let logger = DefaultLogger::with_min_severity(LogSeverity::Trace);

    for severity in [
        LogSeverity::Trace,
        LogSeverity::Debug,
        LogSeverity::Info,
        LogSeverity::Warn,
        LogSeverity::Error,
    ] {
        // Just verify it doesn't panic
        logger.log(&entry(severity, "galaxy3d::Bvh", "rebuild"));
    }

    let mut detailed = entry(LogSeverity::Error, "galaxy3d::Config", "bad leaf size");
    detailed.file = Some("config.rs");
    detailed.line = Some(7);
    logger.log(&detailed);
}

// ============================================================================
// LOGGER TRAIT TESTS
// ============================================================================

struct CountingLogger {
    logged: std::sync::Mutex<Vec<LogSeverity>>,
}

impl Logger for CountingLogger {
    fn log(&self, entry: &LogEntry) {
        self.logged.lock().unwrap().push(entry.severity);
    }
}

#[test]
fn test_custom_logger_implementation() {
    let logger = CountingLogger { logged: std::sync::Mutex::new(Vec::new()) };

    logger.log(&entry(LogSeverity::Debug, "galaxy3d::Bvh", "a"));
    logger.log(&entry(LogSeverity::Warn, "galaxy3d::PartitionManager", "b"));

    assert_eq!(*logger.logged.lock().unwrap(), vec![LogSeverity::Debug, LogSeverity::Warn]);
}

#[test]
fn test_logger_trait_is_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<DefaultLogger>();
    assert_send_sync::<CountingLogger>();
}
