//! Streaming speech pipeline.
//!
//! The producer (the caller's thread) segments and synthesizes; playback
//! and display each run as a station on their own thread, fed by queues
//! that carry an explicit end marker.

pub mod display_station;
pub mod error;
pub mod orchestrator;
pub mod playback_station;
pub mod queue;
pub mod station;
pub mod types;

pub use display_station::DisplayStation;
pub use error::{ErrorReporter, LogReporter, StationError};
pub use orchestrator::{Pipeline, PipelineConfig};
pub use playback_station::PlaybackStation;
pub use queue::{QueueError, QueueItem, QueueReceiver, QueueSender};
pub use station::{Processed, Station, StationReport, StationRunner};
pub use types::{CancelToken, RunSummary, SpokenSentence};
