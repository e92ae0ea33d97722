//! Speak command entry point.
//!
//! Wires the configured token source, Piper and aplay into a pipeline run:
//! prompt → LLM tokens → sentences → audio → speaker.

use crate::audio::aplay::{AplayPlayer, PcmFormat};
use crate::audio::mixer::Mixer;
use crate::config::Config;
use crate::defaults;
use crate::error::{Result, SayflowError};
use crate::llm::ReaderTokens;
use crate::pipeline::orchestrator::{Pipeline, PipelineConfig};
use crate::pipeline::types::RunSummary;
use crate::tts::{PiperConfig, PiperSynthesizer};
use std::io::{self, BufReader, Write};
use std::time::Duration;

/// Where the spoken text comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum TextSource {
    /// Ask the LLM this prompt and speak the answer.
    Prompt(String),
    /// Speak whatever arrives on stdin.
    Stdin,
}

/// Run the speak command until the text ends or Ctrl+C.
///
/// A run still busy `SHUTDOWN_GRACE_SECS` after Ctrl+C (for example inside
/// a Piper or aplay call) yields `SayflowError::ShutdownTimeout`. Its
/// blocking task is then abandoned and the caller must exit the process.
///
/// # Arguments
/// * `config` - Effective configuration (file, env and CLI overrides applied)
/// * `source` - Prompt for the LLM, or stdin
/// * `quiet` - Do not echo the text to stdout
/// * `setup_mixer` - Unmute and set the volume before speaking
pub async fn run_speak_command(
    config: Config,
    source: TextSource,
    quiet: bool,
    setup_mixer: bool,
) -> Result<RunSummary> {
    config.validate()?;

    if setup_mixer && config.playback.setup_mixer {
        let mixer = Mixer::system();
        if let Err(e) = mixer.prepare(&config.playback.mixer_control, config.playback.volume) {
            tracing::warn!("mixer setup skipped: {}", e);
        }
    }

    let pipeline = Pipeline::new(PipelineConfig::from(&config));
    let cancel = pipeline.cancel_token();

    let mut task = tokio::task::spawn_blocking(move || -> Result<RunSummary> {
        let tokens = open_source(&config, &source)?;
        let synthesizer = PiperSynthesizer::system(PiperConfig::from(&config.tts));
        let player = AplayPlayer::system(
            &config.playback.command,
            &PcmFormat::from(&config.playback),
        );
        let display: Box<dyn Write + Send> = if quiet {
            Box::new(io::sink())
        } else {
            Box::new(io::stdout())
        };
        pipeline.run(tokens, &synthesizer, Box::new(player), display)
    });

    let joined = tokio::select! {
        res = &mut task => res,
        res = tokio::signal::ctrl_c() => {
            if let Err(e) = res {
                return Err(SayflowError::Other(format!("Failed to wait for Ctrl+C: {}", e)));
            }
            cancel.cancel();
            if !quiet {
                eprintln!("\nStopping...");
            }
            let grace = Duration::from_secs(defaults::SHUTDOWN_GRACE_SECS);
            match tokio::time::timeout(grace, &mut task).await {
                Ok(res) => res,
                Err(_) => {
                    return Err(SayflowError::ShutdownTimeout {
                        seconds: defaults::SHUTDOWN_GRACE_SECS,
                    });
                }
            }
        }
    };

    let summary = joined.map_err(|e| SayflowError::Other(format!("pipeline task failed: {}", e)))??;
    if !quiet {
        println!();
    }
    Ok(summary)
}

type Tokens = Box<dyn Iterator<Item = Result<String>> + Send>;

fn open_source(config: &Config, source: &TextSource) -> Result<Tokens> {
    match source {
        TextSource::Stdin => Ok(Box::new(ReaderTokens::new(BufReader::new(io::stdin())))),
        TextSource::Prompt(prompt) => open_llm(config, prompt),
    }
}

#[cfg(feature = "ollama")]
fn open_llm(config: &Config, prompt: &str) -> Result<Tokens> {
    let client = crate::llm::OllamaClient::new(&config.llm)?;
    Ok(Box::new(client.generate(prompt)?))
}

#[cfg(not(feature = "ollama"))]
fn open_llm(_config: &Config, _prompt: &str) -> Result<Tokens> {
    Err(SayflowError::TokenStream {
        message: "built without the 'ollama' feature; use --stdin".to_string(),
    })
}
