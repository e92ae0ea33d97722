//! sayflow - speak an LLM's answer while it is still being generated
//!
//! Streamed text is cut into sentences, each sentence is synthesized as
//! soon as it is complete, and playback of one sentence overlaps synthesis
//! of the next.

// Enforce error handling discipline in library code
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

pub mod audio;
#[cfg(feature = "cli")]
pub mod cli;
pub mod command;
pub mod config;
pub mod defaults;
#[cfg(feature = "cli")]
pub mod diagnostics;
pub mod error;
pub mod llm;
pub mod pipeline;
pub mod segmenter;
pub mod tts;

// Composition root
#[cfg(feature = "cli")]
pub mod app;

// Core traits (source → synthesize → play)
pub use audio::player::AudioPlayer;
pub use command::{CommandExecutor, SystemCommandExecutor};
pub use tts::synthesizer::Synthesizer;

// Pipeline
pub use pipeline::orchestrator::{Pipeline, PipelineConfig};
pub use pipeline::types::{CancelToken, RunSummary, SpokenSentence};
pub use segmenter::SentenceSegmenter;

// Error handling
pub use error::{Result, SayflowError};

// Config
pub use config::Config;

// Station framework (for advanced users)
pub use pipeline::error::{ErrorReporter, StationError};
pub use pipeline::station::Station;

/// Build version string with optional git commit hash.
///
/// Returns `"0.1.0+abc1234"` when git hash is available, `"0.1.0"` otherwise.
pub fn version_string() -> String {
    let version = env!("CARGO_PKG_VERSION");
    match option_env!("GIT_HASH") {
        Some(hash) if !hash.is_empty() => format!("{}+{}", version, hash),
        _ => version.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_string_starts_with_cargo_version() {
        let ver = version_string();
        assert!(
            ver.starts_with(env!("CARGO_PKG_VERSION")),
            "version_string should start with CARGO_PKG_VERSION, got: {}",
            ver
        );
    }

    #[test]
    fn version_string_hash_suffix_matches_build() {
        let ver = version_string();
        match option_env!("GIT_HASH") {
            Some(hash) if !hash.is_empty() => assert_eq!(ver.split('+').nth(1), Some(hash)),
            _ => assert_eq!(ver, env!("CARGO_PKG_VERSION")),
        }
    }
}
