use crate::defaults;
use crate::error::{Result, SayflowError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub llm: LlmConfig,
    pub tts: TtsConfig,
    pub playback: PlaybackConfig,
    pub pipeline: PipelineSettings,
}

/// Token source configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LlmConfig {
    pub url: String,
    pub model: String,
}

/// Speech synthesis configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TtsConfig {
    pub command: String,
    pub model: String,
}

/// Playback device configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlaybackConfig {
    pub command: String,
    pub sample_rate: u32,
    pub format: String,
    pub channels: u16,
    /// Unmute and set the volume of `mixer_control` before speaking.
    pub setup_mixer: bool,
    pub mixer_control: String,
    pub volume: u8,
}

/// Pipeline buffering configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PipelineSettings {
    /// Synthesized sentences held ahead of playback.
    pub audio_buffer: usize,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            url: defaults::LLM_URL.to_string(),
            model: defaults::LLM_MODEL.to_string(),
        }
    }
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            command: defaults::TTS_COMMAND.to_string(),
            model: defaults::TTS_MODEL.to_string(),
        }
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            command: defaults::PLAYBACK_COMMAND.to_string(),
            sample_rate: defaults::SAMPLE_RATE,
            format: defaults::SAMPLE_FORMAT.to_string(),
            channels: defaults::CHANNELS,
            setup_mixer: true,
            mixer_control: defaults::MIXER_CONTROL.to_string(),
            volume: defaults::MIXER_VOLUME,
        }
    }
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            audio_buffer: defaults::AUDIO_BUFFER,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Missing fields use default values. The result is validated.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents).map_err(|e| SayflowError::ConfigParse {
            message: format!("{}: {}", path.display(), e),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration, falling back to defaults only if the file is missing.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match Self::load(path) {
            Ok(config) => Ok(config),
            Err(SayflowError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                Ok(Self::default())
            }
            Err(e) => Err(e),
        }
    }

    /// Reject values the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.pipeline.audio_buffer == 0 {
            return Err(SayflowError::ConfigInvalidValue {
                key: "pipeline.audio_buffer".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.playback.sample_rate == 0 {
            return Err(SayflowError::ConfigInvalidValue {
                key: "playback.sample_rate".to_string(),
                message: "must be positive".to_string(),
            });
        }
        if self.playback.channels == 0 {
            return Err(SayflowError::ConfigInvalidValue {
                key: "playback.channels".to_string(),
                message: "must be positive".to_string(),
            });
        }
        if self.playback.volume > 100 {
            return Err(SayflowError::ConfigInvalidValue {
                key: "playback.volume".to_string(),
                message: format!("{} is not a percentage", self.playback.volume),
            });
        }
        if self.tts.model.trim().is_empty() {
            return Err(SayflowError::ConfigInvalidValue {
                key: "tts.model".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - SAYFLOW_LLM_URL → llm.url
    /// - SAYFLOW_LLM_MODEL → llm.model
    /// - SAYFLOW_TTS_MODEL → tts.model
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var("SAYFLOW_LLM_URL")
            && !url.is_empty()
        {
            self.llm.url = url;
        }

        if let Ok(model) = std::env::var("SAYFLOW_LLM_MODEL")
            && !model.is_empty()
        {
            self.llm.model = model;
        }

        if let Ok(model) = std::env::var("SAYFLOW_TTS_MODEL")
            && !model.is_empty()
        {
            self.tts.model = model;
        }

        self
    }

    /// Serialize to TOML, as written by `sayflow config init`.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Get the default configuration file path
    ///
    /// Returns ~/.config/sayflow/config.toml on Linux, or None when the
    /// platform has no config directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("sayflow").join("config.toml"))
    }
}
