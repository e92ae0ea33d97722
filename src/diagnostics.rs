//! System diagnostics and dependency checking.
//!
//! Verifies that the synthesis and playback tools are installed and the LLM
//! endpoint answers.

use crate::config::Config;
use std::path::Path;
use std::process::Command;

/// Result of a dependency check.
#[derive(Debug, PartialEq)]
pub enum CheckResult {
    /// Tool is installed and working
    Ok,
    /// Tool is not found
    NotFound,
    /// Tool is found but has issues (e.g., model file missing)
    Warning(String),
}

/// Check if a command exists and is executable.
fn check_command(command: &str) -> CheckResult {
    match Command::new(command).arg("--version").output() {
        Ok(output) if output.status.success() => CheckResult::Ok,
        Ok(_) => CheckResult::Warning(format!("'{}' found but --version failed", command)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => CheckResult::NotFound,
        Err(e) => CheckResult::Warning(format!("Error checking '{}': {}", command, e)),
    }
}

/// Check the voice model file, when it is given as a path.
///
/// Bare names are resolved by piper itself and are not checked here.
fn check_voice_model(model: &str) -> CheckResult {
    let path = Path::new(model);
    if path.components().count() <= 1 && !path.exists() {
        return CheckResult::Ok;
    }
    if !path.exists() {
        return CheckResult::NotFound;
    }
    let config = format!("{}.json", model);
    if Path::new(&config).exists() {
        CheckResult::Ok
    } else {
        CheckResult::Warning(format!("voice config '{}' missing next to the model", config))
    }
}

/// Check that the LLM endpoint answers.
#[cfg(feature = "ollama")]
fn check_llm(config: &Config) -> CheckResult {
    match crate::llm::OllamaClient::new(&config.llm) {
        Ok(client) if client.is_reachable() => CheckResult::Ok,
        Ok(_) => CheckResult::NotFound,
        Err(e) => CheckResult::Warning(e.to_string()),
    }
}

#[cfg(not(feature = "ollama"))]
fn check_llm(_config: &Config) -> CheckResult {
    CheckResult::Warning("built without the 'ollama' feature".to_string())
}

fn print_result(result: &CheckResult, missing_hint: &[&str]) -> bool {
    match result {
        CheckResult::Ok => {
            println!("✓ OK");
            true
        }
        CheckResult::NotFound => {
            println!("✗ NOT FOUND");
            for line in missing_hint {
                println!("  {}", line);
            }
            false
        }
        CheckResult::Warning(msg) => {
            println!("⚠ WARNING: {}", msg);
            false
        }
    }
}

/// Run all dependency checks and print results.
///
/// Returns true when everything needed to speak is available.
pub fn check_dependencies(config: &Config) -> bool {
    println!("Checking system dependencies...\n");

    print!("{} (speech synthesis): ", config.tts.command);
    let tts_ok = print_result(
        &check_command(&config.tts.command),
        &["Install: pip install piper-tts", "     or: download a release from github.com/rhasspy/piper"],
    );

    print!("Voice model {}: ", config.tts.model);
    let model_ok = print_result(
        &check_voice_model(&config.tts.model),
        &["Download a voice (.onnx + .onnx.json) from huggingface.co/rhasspy/piper-voices"],
    );

    print!("{} (playback): ", config.playback.command);
    let playback_ok = print_result(
        &check_command(&config.playback.command),
        &["Install: sudo apt install alsa-utils  (Debian/Ubuntu)", "         sudo pacman -S alsa-utils    (Arch)"],
    );

    if config.playback.setup_mixer {
        print!("amixer (volume setup): ");
        print_result(
            &check_command("amixer"),
            &["Optional: install alsa-utils, or set playback.setup_mixer = false"],
        );
    }

    print!("LLM at {}: ", config.llm.url);
    let llm_ok = print_result(
        &check_llm(config),
        &["Start it with: ollama serve", "Then pull the model: ollama pull <model>"],
    );

    println!();
    let ready = tts_ok && model_ok && playback_ok;
    if ready && llm_ok {
        println!("✓ Ready to speak.");
    } else if ready {
        println!("⚠ LLM not reachable; `sayflow --stdin` still works.");
    } else {
        println!("✗ Speech output will not work until the items above are fixed.");
    }
    ready
}
