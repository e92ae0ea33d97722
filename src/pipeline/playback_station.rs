//! Playback worker: plays queued sentences in order.

use crate::audio::player::AudioPlayer;
use crate::pipeline::error::StationError;
use crate::pipeline::station::{Processed, Station};
use crate::pipeline::types::{CancelToken, SpokenSentence};

pub struct PlaybackStation {
    player: Box<dyn AudioPlayer>,
    cancel: Option<CancelToken>,
}

impl PlaybackStation {
    pub fn new(player: Box<dyn AudioPlayer>) -> Self {
        Self {
            player,
            cancel: None,
        }
    }

    /// Once `token` is cancelled, remaining chunks are drained unplayed.
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }
}

impl Station for PlaybackStation {
    type Input = SpokenSentence;

    fn process(&mut self, sentence: SpokenSentence) -> Result<Processed, StationError> {
        if self.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
            tracing::debug!(sequence = sentence.sequence, "cancelled, not playing");
            return Ok(Processed::Skipped);
        }

        tracing::debug!(
            sequence = sentence.sequence,
            bytes = sentence.audio.len(),
            text = %sentence.text,
            "playing"
        );
        self.player.play(&sentence.audio).map_err(|e| {
            StationError::Recoverable(format!("sentence {}: {}", sentence.sequence, e))
        })?;
        Ok(Processed::Done)
    }

    fn name(&self) -> &'static str {
        "playback"
    }
}
