//! Sentence synthesis abstraction and an in-memory test double.

use crate::error::{Result, SayflowError};
use std::sync::{Arc, Mutex};

/// Trait for text-to-speech synthesis.
///
/// Implementations block the calling thread until the audio for the whole
/// sentence is available. They hold no per-call mutable state, so one
/// instance serves a whole run.
pub trait Synthesizer: Send + Sync {
    /// Synthesize one sentence into raw PCM bytes.
    ///
    /// Empty sentences and empty engine output are errors.
    fn synthesize(&self, sentence: &str) -> Result<Vec<u8>>;

    /// Name of the engine/voice, for logs.
    fn name(&self) -> &str;
}

impl<T: Synthesizer> Synthesizer for Arc<T> {
    fn synthesize(&self, sentence: &str) -> Result<Vec<u8>> {
        (**self).synthesize(sentence)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Mock synthesizer for testing
///
/// Returns the sentence's UTF-8 bytes as "audio", so tests can read back
/// exactly which sentence a chunk belongs to.
#[derive(Debug, Default)]
pub struct MockSynthesizer {
    fail_on: Vec<String>,
    requests: Mutex<Vec<String>>,
}

impl MockSynthesizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail whenever asked to synthesize exactly this sentence.
    pub fn with_failure_on(mut self, sentence: &str) -> Self {
        self.fail_on.push(sentence.to_string());
        self
    }

    /// Sentences received so far, in call order.
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl Synthesizer for MockSynthesizer {
    fn synthesize(&self, sentence: &str) -> Result<Vec<u8>> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(sentence.to_string());

        if sentence.trim().is_empty() {
            return Err(SayflowError::Synthesis {
                message: "empty sentence".to_string(),
            });
        }
        if self.fail_on.iter().any(|s| s == sentence) {
            return Err(SayflowError::Synthesis {
                message: format!("mock failure for {:?}", sentence),
            });
        }
        Ok(sentence.as_bytes().to_vec())
    }

    fn name(&self) -> &str {
        "mock"
    }
}
