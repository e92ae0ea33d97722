//! Command-line interface for sayflow
//!
//! Provides argument parsing using clap derive macros.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// Speak an LLM's answer while it is still being generated
#[derive(Parser, Debug)]
#[command(
    name = "sayflow",
    version,
    about = "Speak an LLM's answer while it is still being generated",
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Prompt sent to the LLM (default: a short built-in prompt)
    #[arg(value_name = "PROMPT")]
    pub prompt: Option<String>,

    /// Speak text read from stdin instead of querying the LLM
    #[arg(long, conflicts_with = "prompt")]
    pub stdin: bool,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Suppress the streamed text on stdout
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose output (-v: run summary, -vv: debug logs)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// LLM model name (e.g., qwen2:0.5b, llama3.2)
    #[arg(long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Piper voice model (.onnx)
    #[arg(long, value_name = "MODEL")]
    pub tts_model: Option<String>,

    /// Number of synthesized sentences buffered ahead of playback
    #[arg(long, short = 'b', value_name = "N", value_parser = clap::value_parser!(u16).range(1..))]
    pub buffer: Option<u16>,

    /// Leave the mixer alone (skip unmute and volume setup)
    #[arg(long)]
    pub no_mixer: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check system dependencies
    Check,

    /// View and initialize configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Configuration management actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Print the configuration file location
    Path,
    /// Write the default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_default_command() {
        let cli = Cli::try_parse_from(["sayflow"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.prompt.is_none());
        assert!(!cli.stdin);
        assert!(cli.model.is_none());
        assert!(cli.tts_model.is_none());
        assert!(cli.buffer.is_none());
        assert!(!cli.no_mixer);
        assert!(!cli.quiet);
        assert_eq!(cli.verbose, 0);
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_parse_prompt() {
        let cli = Cli::try_parse_from(["sayflow", "Tell me about otters"]).unwrap();
        assert_eq!(cli.prompt.as_deref(), Some("Tell me about otters"));
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_parse_verbose_double() {
        let cli = Cli::try_parse_from(["sayflow", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_parse_with_options() {
        let cli = Cli::try_parse_from([
            "sayflow",
            "--model",
            "llama3.2",
            "--tts-model",
            "en_GB-alan-low.onnx",
            "--buffer",
            "5",
            "--no-mixer",
            "hello",
        ])
        .unwrap();

        assert_eq!(cli.model.as_deref(), Some("llama3.2"));
        assert_eq!(cli.tts_model.as_deref(), Some("en_GB-alan-low.onnx"));
        assert_eq!(cli.buffer, Some(5));
        assert!(cli.no_mixer);
        assert_eq!(cli.prompt.as_deref(), Some("hello"));
    }

    #[test]
    fn test_zero_buffer_rejected() {
        assert!(Cli::try_parse_from(["sayflow", "--buffer", "0"]).is_err());
    }

    #[test]
    fn test_stdin_conflicts_with_prompt() {
        let err = Cli::try_parse_from(["sayflow", "--stdin", "hello"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_parse_check() {
        let cli = Cli::try_parse_from(["sayflow", "check"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Check)));
        assert!(cli.prompt.is_none());
    }

    #[test]
    fn test_parse_config_actions() {
        let cli = Cli::try_parse_from(["sayflow", "config", "show"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Config {
                action: ConfigAction::Show
            })
        ));

        let cli = Cli::try_parse_from(["sayflow", "config", "init", "--force"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Config {
                action: ConfigAction::Init { force: true }
            })
        ));
    }

    #[test]
    fn test_config_requires_subcommand() {
        assert!(Cli::try_parse_from(["sayflow", "config"]).is_err());
    }

    #[test]
    fn test_global_options_after_command() {
        let cli =
            Cli::try_parse_from(["sayflow", "check", "--config", "/tmp/config.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/config.toml")));
    }

    #[test]
    fn test_parse_completions() {
        let cli = Cli::try_parse_from(["sayflow", "completions", "bash"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Completions { shell: Shell::Bash })
        ));
    }

    #[test]
    fn test_version_flag() {
        let err = Cli::try_parse_from(["sayflow", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }
}
