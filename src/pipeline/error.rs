//! Error types and reporting for pipeline stations.

use thiserror::Error;

/// Errors that can occur during station processing.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StationError {
    /// Recoverable error that allows the station to continue processing.
    #[error("Recoverable error: {0}")]
    Recoverable(String),
    /// Fatal error that requires the station to shut down.
    #[error("Fatal error: {0}")]
    Fatal(String),
}

/// Trait for reporting station errors.
pub trait ErrorReporter: Send + Sync {
    /// Reports an error from a station.
    fn report(&self, station: &str, error: &StationError);
}

/// Error reporter that forwards to `tracing`.
///
/// Recoverable errors log at WARN, fatal ones at ERROR.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter;

impl ErrorReporter for LogReporter {
    fn report(&self, station: &str, error: &StationError) {
        match error {
            StationError::Recoverable(msg) => tracing::warn!(station, "{}", msg),
            StationError::Fatal(msg) => tracing::error!(station, "{}", msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_station_error_display() {
        let recoverable = StationError::Recoverable("temporary failure".to_string());
        assert_eq!(
            recoverable.to_string(),
            "Recoverable error: temporary failure"
        );

        let fatal = StationError::Fatal("critical failure".to_string());
        assert_eq!(fatal.to_string(), "Fatal error: critical failure");
    }

    #[test]
    fn test_log_reporter() {
        let reporter = LogReporter;
        // No subscriber installed; must not panic
        reporter.report("playback", &StationError::Recoverable("busy".to_string()));
        reporter.report("display", &StationError::Fatal("closed".to_string()));
    }
}
