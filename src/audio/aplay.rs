//! Playback through ALSA's `aplay`.

use crate::audio::player::AudioPlayer;
use crate::command::{CommandExecutor, SystemCommandExecutor};
use crate::config::PlaybackConfig;
use crate::error::{Result, SayflowError};

/// Raw PCM format shared by the synthesizer and the playback device.
#[derive(Debug, Clone, PartialEq)]
pub struct PcmFormat {
    pub sample_rate: u32,
    /// `aplay -f` format name, e.g. "S16_LE".
    pub format: String,
    pub channels: u16,
}

impl From<&PlaybackConfig> for PcmFormat {
    fn from(config: &PlaybackConfig) -> Self {
        Self {
            sample_rate: config.sample_rate,
            format: config.format.clone(),
            channels: config.channels,
        }
    }
}

/// Plays each chunk by piping it into a fresh `aplay` process.
pub struct AplayPlayer<E: CommandExecutor = SystemCommandExecutor> {
    command: String,
    args: Vec<String>,
    executor: E,
}

impl AplayPlayer<SystemCommandExecutor> {
    pub fn system(command: &str, format: &PcmFormat) -> Self {
        Self::new(command, format, SystemCommandExecutor::new())
    }
}

impl<E: CommandExecutor> AplayPlayer<E> {
    pub fn new(command: &str, format: &PcmFormat, executor: E) -> Self {
        let args = vec![
            "-q".to_string(),
            "-t".to_string(),
            "raw".to_string(),
            "-r".to_string(),
            format.sample_rate.to_string(),
            "-f".to_string(),
            format.format.clone(),
            "-c".to_string(),
            format.channels.to_string(),
        ];
        Self {
            command: command.to_string(),
            args,
            executor,
        }
    }
}

impl<E: CommandExecutor> AudioPlayer for AplayPlayer<E> {
    fn play(&self, audio: &[u8]) -> Result<()> {
        if audio.is_empty() {
            return Ok(());
        }

        let args: Vec<&str> = self.args.iter().map(String::as_str).collect();
        self.executor
            .execute(&self.command, &args, audio)
            .map_err(|e| SayflowError::Playback {
                message: e.to_string(),
            })?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "aplay"
    }
}
