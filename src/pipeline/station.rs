//! Worker station abstraction and the thread that drives it.
//!
//! A station consumes one queue until it sees the end marker (or the
//! producer disappears), then runs its shutdown hook and exits. After that
//! it never touches the queue again.

use crate::error::Result;
use crate::pipeline::error::{ErrorReporter, StationError};
use crate::pipeline::queue::{QueueItem, QueueReceiver};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Outcome of processing one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Processed {
    Done,
    /// Deliberately not acted upon (e.g. playback after cancellation).
    Skipped,
}

/// A consuming stage of the pipeline.
pub trait Station: Send + 'static {
    /// The item type this station receives.
    type Input: Send + 'static;

    /// Processes a single item.
    ///
    /// Recoverable errors are reported and the loop continues; fatal errors
    /// are reported and stop the station.
    fn process(&mut self, input: Self::Input) -> std::result::Result<Processed, StationError>;

    /// Returns the name of this station for logging and error reporting.
    fn name(&self) -> &'static str;

    /// Called once when the station stops, whatever the reason.
    fn shutdown(&mut self) {}
}

/// Counters returned by a finished station.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StationReport {
    pub processed: u64,
    pub skipped: u64,
    pub failed: u64,
    /// The end marker was received (and was the last thing dequeued).
    pub end_received: bool,
}

/// Runs a station in a dedicated thread.
pub struct StationRunner {
    handle: Option<JoinHandle<StationReport>>,
    station_name: &'static str,
}

impl StationRunner {
    /// Spawns `station` on a named thread consuming `input`.
    pub fn spawn<S: Station>(
        mut station: S,
        input: QueueReceiver<S::Input>,
        error_reporter: Arc<dyn ErrorReporter>,
    ) -> Result<Self> {
        let station_name = station.name();

        let handle = thread::Builder::new()
            .name(format!("sayflow-{}", station_name))
            .spawn(move || Self::run_station(&mut station, input, error_reporter))?;

        Ok(Self {
            handle: Some(handle),
            station_name,
        })
    }

    fn run_station<S: Station>(
        station: &mut S,
        input: QueueReceiver<S::Input>,
        error_reporter: Arc<dyn ErrorReporter>,
    ) -> StationReport {
        let station_name = station.name();
        let mut report = StationReport::default();

        loop {
            match input.get() {
                Some(QueueItem::Item(item)) => match station.process(item) {
                    Ok(Processed::Done) => report.processed += 1,
                    Ok(Processed::Skipped) => report.skipped += 1,
                    Err(error @ StationError::Recoverable(_)) => {
                        report.failed += 1;
                        error_reporter.report(station_name, &error);
                    }
                    Err(error @ StationError::Fatal(_)) => {
                        report.failed += 1;
                        error_reporter.report(station_name, &error);
                        break;
                    }
                },
                Some(QueueItem::End) => {
                    report.end_received = true;
                    break;
                }
                None => {
                    tracing::debug!(
                        station = station_name,
                        "producer dropped without end marker"
                    );
                    break;
                }
            }
        }

        // Release the queue before the shutdown hook so a producer still
        // blocked on `put` fails fast instead of waiting on us.
        drop(input);
        station.shutdown();
        report
    }

    /// Waits for the station thread to complete.
    pub fn join(mut self) -> std::result::Result<StationReport, String> {
        match self.handle.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| format!("Station '{}' thread panicked", self.station_name)),
            None => Ok(StationReport::default()),
        }
    }

    /// True once the station thread has exited.
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(|h| h.is_finished())
    }

    /// Returns the name of the station.
    pub fn name(&self) -> &'static str {
        self.station_name
    }
}
