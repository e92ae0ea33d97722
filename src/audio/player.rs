//! Audio playback abstraction and a recording test double.

use crate::error::{Result, SayflowError};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Trait for audio playback devices.
///
/// `play` blocks until the chunk has finished playing. Implementations keep
/// no per-call mutable state beyond their configuration.
pub trait AudioPlayer: Send + Sync {
    /// Play raw PCM bytes in the format agreed with the synthesizer.
    fn play(&self, audio: &[u8]) -> Result<()>;

    /// Name for logging/debugging.
    fn name(&self) -> &'static str {
        "player"
    }
}

impl<T: AudioPlayer> AudioPlayer for Arc<T> {
    fn play(&self, audio: &[u8]) -> Result<()> {
        (**self).play(audio)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

/// Player that records chunks instead of playing them.
///
/// Clones share the same recording, so a test can keep one clone while the
/// pipeline owns another.
#[derive(Debug, Clone, Default)]
pub struct CollectorPlayer {
    played: Arc<Mutex<Vec<Vec<u8>>>>,
    fail_on: Arc<Vec<Vec<u8>>>,
    delay: Duration,
}

impl CollectorPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail when asked to play exactly these bytes.
    pub fn with_failure_on(mut self, audio: &[u8]) -> Self {
        let mut fail_on = (*self.fail_on).clone();
        fail_on.push(audio.to_vec());
        self.fail_on = Arc::new(fail_on);
        self
    }

    /// Sleep this long per chunk to simulate a slow device.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Chunks played so far, in order.
    pub fn played(&self) -> Vec<Vec<u8>> {
        self.played.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Played chunks decoded as UTF-8, for use with `MockSynthesizer`.
    pub fn played_text(&self) -> Vec<String> {
        self.played()
            .iter()
            .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
            .collect()
    }
}

impl AudioPlayer for CollectorPlayer {
    fn play(&self, audio: &[u8]) -> Result<()> {
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
        if self.fail_on.iter().any(|chunk| chunk == audio) {
            return Err(SayflowError::Playback {
                message: "collector configured to fail".to_string(),
            });
        }
        self.played
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(audio.to_vec());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "collector"
    }
}
