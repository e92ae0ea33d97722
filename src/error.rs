//! Error types for sayflow.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SayflowError {
    // Configuration errors
    #[error("Failed to parse configuration: {message}")]
    ConfigParse { message: String },

    #[error("Invalid configuration value for {key}: {message}")]
    ConfigInvalidValue { key: String, message: String },

    #[error("Failed to serialize configuration: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    // External command errors
    #[error("Command not found: {command}")]
    CommandNotFound { command: String },

    #[error("Permission denied running {command}: {message}")]
    CommandPermissionDenied { command: String, message: String },

    #[error("{command} failed: {message}")]
    CommandFailed { command: String, message: String },

    // Speech errors
    #[error("Speech synthesis failed: {message}")]
    Synthesis { message: String },

    #[error("Audio playback failed: {message}")]
    Playback { message: String },

    // Token stream errors
    #[error("Token stream failed: {message}")]
    TokenStream { message: String },

    #[cfg(feature = "ollama")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // Shutdown errors
    #[error("Pipeline did not stop within {seconds}s of Ctrl+C")]
    ShutdownTimeout { seconds: u64 },

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, SayflowError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_config_invalid_value_display() {
        let error = SayflowError::ConfigInvalidValue {
            key: "pipeline.audio_buffer".to_string(),
            message: "must be at least 1".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid configuration value for pipeline.audio_buffer: must be at least 1"
        );
    }

    #[test]
    fn test_command_errors_display() {
        let not_found = SayflowError::CommandNotFound {
            command: "piper".to_string(),
        };
        assert_eq!(not_found.to_string(), "Command not found: piper");

        let failed = SayflowError::CommandFailed {
            command: "aplay".to_string(),
            message: "exit status 1".to_string(),
        };
        assert_eq!(failed.to_string(), "aplay failed: exit status 1");
    }

    #[test]
    fn test_speech_errors_display() {
        let synthesis = SayflowError::Synthesis {
            message: "empty sentence".to_string(),
        };
        assert_eq!(synthesis.to_string(), "Speech synthesis failed: empty sentence");

        let playback = SayflowError::Playback {
            message: "device busy".to_string(),
        };
        assert_eq!(playback.to_string(), "Audio playback failed: device busy");
    }

    #[test]
    fn test_token_stream_display() {
        let error = SayflowError::TokenStream {
            message: "connection reset".to_string(),
        };
        assert_eq!(error.to_string(), "Token stream failed: connection reset");
    }

    #[test]
    fn test_shutdown_timeout_display() {
        let error = SayflowError::ShutdownTimeout { seconds: 2 };
        assert_eq!(error.to_string(), "Pipeline did not stop within 2s of Ctrl+C");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed");
        let error: SayflowError = io_error.into();
        assert!(matches!(error, SayflowError::Io(_)));
        assert!(error.to_string().contains("pipe closed"));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_error = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let error: SayflowError = json_error.into();
        assert!(matches!(error, SayflowError::Json(_)));
    }

    #[test]
    fn test_result_type_alias() {
        fn fails() -> Result<()> {
            Err(SayflowError::Other("boom".to_string()))
        }
        assert_eq!(fails().unwrap_err().to_string(), "boom");
    }
}
