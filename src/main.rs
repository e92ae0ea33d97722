use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use owo_colors::OwoColorize;
use sayflow::SayflowError;
use sayflow::app::{TextSource, run_speak_command};
use sayflow::cli::{Cli, Commands, ConfigAction};
use sayflow::config::Config;
use sayflow::defaults;
use sayflow::diagnostics::check_dependencies;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Conventional exit status after SIGINT.
const EXIT_INTERRUPTED: i32 = 130;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.quiet, cli.verbose);

    match cli.command {
        None => {
            let mut config = load_config(cli.config.as_deref())?;
            if let Some(model) = cli.model {
                config.llm.model = model;
            }
            if let Some(tts_model) = cli.tts_model {
                config.tts.model = tts_model;
            }
            if let Some(buffer) = cli.buffer {
                config.pipeline.audio_buffer = usize::from(buffer);
            }

            let source = if cli.stdin {
                TextSource::Stdin
            } else {
                TextSource::Prompt(
                    cli.prompt
                        .unwrap_or_else(|| defaults::DEFAULT_PROMPT.to_string()),
                )
            };

            let summary = match run_speak_command(config, source, cli.quiet, !cli.no_mixer).await
            {
                Ok(summary) => summary,
                Err(e @ SayflowError::ShutdownTimeout { .. }) => {
                    // The runtime would wait forever on the stuck blocking task
                    eprintln!("Error: {}", e);
                    std::process::exit(EXIT_INTERRUPTED);
                }
                Err(e) => return Err(e.into()),
            };

            if cli.verbose >= 1 {
                let colored = std::io::stderr().is_terminal();
                if colored {
                    eprintln!("{} {}", "done:".dimmed(), summary);
                } else {
                    eprintln!("done: {}", summary);
                }
            }
            if let Some(error) = summary.upstream_error {
                anyhow::bail!("text stream ended early: {}", error);
            }
        }
        Some(Commands::Check) => {
            let config = load_config(cli.config.as_deref())?;
            if !check_dependencies(&config) {
                std::process::exit(1);
            }
        }
        Some(Commands::Config { action }) => {
            handle_config_command(action, cli.config.as_deref())?;
        }
        Some(Commands::Completions { shell }) => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "sayflow",
                &mut std::io::stdout(),
            );
        }
    }

    Ok(())
}

/// Logs go to stderr so stdout carries only the spoken text.
fn init_logging(quiet: bool, verbosity: u8) {
    let default_level = match verbosity {
        0 if quiet => "sayflow=error",
        0 => "sayflow=warn",
        1 => "sayflow=info",
        _ => "sayflow=debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn config_path(custom_path: Option<&Path>) -> Option<PathBuf> {
    custom_path.map(Path::to_path_buf).or_else(Config::default_path)
}

fn load_config(custom_path: Option<&Path>) -> Result<Config> {
    let config = match custom_path {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => match Config::default_path() {
            Some(path) => Config::load_or_default(&path)?,
            None => Config::default(),
        },
    };

    Ok(config.with_env_overrides())
}

fn handle_config_command(action: ConfigAction, custom_path: Option<&Path>) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = load_config(custom_path)?;
            print!("{}", config.to_toml()?);
        }
        ConfigAction::Path => match config_path(custom_path) {
            Some(path) => println!("{}", path.display()),
            None => anyhow::bail!("Could not determine the config directory"),
        },
        ConfigAction::Init { force } => {
            let path = config_path(custom_path)
                .context("Could not determine the config directory")?;
            if path.exists() && !force {
                anyhow::bail!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                );
            }
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            std::fs::write(&path, Config::default().to_toml()?)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("{} {}", "Wrote".green(), path.display());
        }
    }
    Ok(())
}
