//! Piper TTS driven as a subprocess.
//!
//! `piper --model <voice> --output_raw` reads one sentence on stdin and
//! writes raw mono S16_LE PCM at the voice's sample rate on stdout.

use crate::command::{CommandExecutor, SystemCommandExecutor};
use crate::config::TtsConfig;
use crate::error::{Result, SayflowError};
use crate::tts::synthesizer::Synthesizer;

/// Configuration for the Piper subprocess.
#[derive(Debug, Clone, PartialEq)]
pub struct PiperConfig {
    /// Piper executable name or path.
    pub command: String,
    /// Voice model (.onnx) passed to `--model`.
    pub model: String,
}

impl From<&TtsConfig> for PiperConfig {
    fn from(config: &TtsConfig) -> Self {
        Self {
            command: config.command.clone(),
            model: config.model.clone(),
        }
    }
}

/// Synthesizer that runs one Piper process per sentence.
pub struct PiperSynthesizer<E: CommandExecutor = SystemCommandExecutor> {
    config: PiperConfig,
    executor: E,
}

impl PiperSynthesizer<SystemCommandExecutor> {
    /// Piper on the real system.
    pub fn system(config: PiperConfig) -> Self {
        Self::new(config, SystemCommandExecutor::new())
    }
}

impl<E: CommandExecutor> PiperSynthesizer<E> {
    pub fn new(config: PiperConfig, executor: E) -> Self {
        Self { config, executor }
    }

    fn args(&self) -> [&str; 3] {
        ["--model", &self.config.model, "--output_raw"]
    }
}

impl<E: CommandExecutor> Synthesizer for PiperSynthesizer<E> {
    fn synthesize(&self, sentence: &str) -> Result<Vec<u8>> {
        let text = sentence.trim();
        if text.is_empty() {
            return Err(SayflowError::Synthesis {
                message: "empty sentence".to_string(),
            });
        }

        let audio = self
            .executor
            .execute(&self.config.command, &self.args(), text.as_bytes())
            .map_err(|e| match e {
                SayflowError::CommandNotFound { command } => SayflowError::Synthesis {
                    message: format!(
                        "{} not found. Install Piper: https://github.com/rhasspy/piper",
                        command
                    ),
                },
                other => SayflowError::Synthesis {
                    message: other.to_string(),
                },
            })?;

        if audio.is_empty() {
            return Err(SayflowError::Synthesis {
                message: format!("{} produced no audio", self.config.command),
            });
        }

        Ok(audio)
    }

    fn name(&self) -> &str {
        &self.config.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::MockCommandExecutor;

    fn config() -> PiperConfig {
        PiperConfig {
            command: "piper".to_string(),
            model: "en_US-lessac-medium.onnx".to_string(),
        }
    }

    #[test]
    fn test_synthesize_runs_piper_with_raw_output() {
        let executor = MockCommandExecutor::new().with_output(&[0x01, 0x02, 0x03, 0x04]);
        let piper = PiperSynthesizer::new(config(), executor);

        let audio = piper.synthesize("  Hello world.  ").unwrap();
        assert_eq!(audio, vec![0x01, 0x02, 0x03, 0x04]);

        let calls = piper.executor.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "piper");
        assert_eq!(
            calls[0].1,
            vec!["--model", "en_US-lessac-medium.onnx", "--output_raw"]
        );
        // Sentence is trimmed before being written to stdin
        assert_eq!(calls[0].2, b"Hello world.".to_vec());
    }

    #[test]
    fn test_empty_sentence_is_rejected_without_spawning() {
        let piper = PiperSynthesizer::new(config(), MockCommandExecutor::new());
        assert!(matches!(
            piper.synthesize(" \n "),
            Err(SayflowError::Synthesis { .. })
        ));
        assert_eq!(piper.executor.call_count(), 0);
    }

    #[test]
    fn test_empty_output_is_failure() {
        let piper = PiperSynthesizer::new(config(), MockCommandExecutor::new().with_output(b""));
        match piper.synthesize("Silent.") {
            Err(SayflowError::Synthesis { message }) => {
                assert!(message.contains("no audio"));
            }
            other => panic!("Expected Synthesis error, got {:?}", other),
        }
    }

    #[test]
    fn test_nonzero_exit_is_failure() {
        let executor = MockCommandExecutor::new().with_error(SayflowError::CommandFailed {
            command: "piper".to_string(),
            message: "exited with exit status: 1: model not found".to_string(),
        });
        let piper = PiperSynthesizer::new(config(), executor);
        match piper.synthesize("Hello.") {
            Err(SayflowError::Synthesis { message }) => {
                assert!(message.contains("model not found"));
            }
            other => panic!("Expected Synthesis error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_binary_mentions_install() {
        let executor = MockCommandExecutor::new().with_error(SayflowError::CommandNotFound {
            command: "piper".to_string(),
        });
        let piper = PiperSynthesizer::new(config(), executor);
        let message = piper.synthesize("Hello.").unwrap_err().to_string();
        assert!(message.contains("Install Piper"));
    }

    #[test]
    fn test_config_from_tts_section() {
        let tts = TtsConfig {
            command: "/opt/piper".to_string(),
            model: "voice.onnx".to_string(),
        };
        let config = PiperConfig::from(&tts);
        assert_eq!(config.command, "/opt/piper");
        assert_eq!(config.model, "voice.onnx");
    }

    #[test]
    fn test_name_is_voice_model() {
        let piper = PiperSynthesizer::new(config(), MockCommandExecutor::new());
        assert_eq!(piper.name(), "en_US-lessac-medium.onnx");
    }
}
