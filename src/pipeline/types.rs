//! Data types for the speech pipeline.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// A synthesized sentence on its way to the speaker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpokenSentence {
    /// Position of the sentence within the run, starting at 0.
    pub sequence: u64,
    /// The sentence text, trimmed.
    pub text: String,
    /// Raw PCM produced by the synthesizer.
    pub audio: Vec<u8>,
}

impl SpokenSentence {
    pub fn new(sequence: u64, text: String, audio: Vec<u8>) -> Self {
        Self {
            sequence,
            text,
            audio,
        }
    }
}

/// Cooperative cancellation flag shared between the caller and a running pipeline.
///
/// Once cancelled it stays cancelled.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// What happened during one pipeline run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    /// Fragments received from the token source.
    pub tokens: u64,
    /// Sentences handed to the synthesizer (including the flushed remainder).
    pub sentences: u64,
    /// Sentences that produced audio and were queued for playback.
    pub synthesized: u64,
    pub synthesis_failures: u64,
    pub played: u64,
    pub playback_failures: u64,
    /// Chunks dequeued but not played because the run was cancelled.
    pub playback_skipped: u64,
    /// Fragments written by the display worker.
    pub displayed: u64,
    pub cancelled: bool,
    /// Both workers stopped on their end marker rather than on a fatal error.
    pub clean_shutdown: bool,
    /// Set when the token source failed mid-stream.
    pub upstream_error: Option<String>,
    /// Time from run start until the first audio chunk was queued.
    pub first_audio: Option<Duration>,
    pub elapsed: Duration,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} tokens, {} sentences, {} synthesized ({} failed), {} played ({} failed, {} skipped) in {:.1}s",
            self.tokens,
            self.sentences,
            self.synthesized,
            self.synthesis_failures,
            self.played,
            self.playback_failures,
            self.playback_skipped,
            self.elapsed.as_secs_f64()
        )?;
        if let Some(first) = self.first_audio {
            write!(f, ", first audio after {}ms", first.as_millis())?;
        }
        if self.cancelled {
            write!(f, " [cancelled]")?;
        }
        if let Some(ref error) = self.upstream_error {
            write!(f, " [stream error: {}]", error)?;
        }
        Ok(())
    }
}
