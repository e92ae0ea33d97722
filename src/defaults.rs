//! Default configuration constants for sayflow.
//!
//! Shared by the config file defaults, the CLI and the pipeline so the
//! synthesis and playback sides always agree on the audio format.

/// Default Ollama endpoint.
pub const LLM_URL: &str = "http://localhost:11434";

/// Default generation model.
///
/// Small enough to generate faster than Piper can speak on a laptop CPU.
pub const LLM_MODEL: &str = "qwen2:0.5b";

/// Prompt used when none is given on the command line.
pub const DEFAULT_PROMPT: &str = "Tell me about the 'The Creative Act' book. \
Make sure to use proper punctuation and complete sentences. \
If you do not have memory of this, do not answer";

/// Speech synthesis command.
pub const TTS_COMMAND: &str = "piper";

/// Default Piper voice model.
pub const TTS_MODEL: &str = "en_US-lessac-medium.onnx";

/// Playback command.
pub const PLAYBACK_COMMAND: &str = "aplay";

/// Sample rate of Piper's medium voices, in Hz.
pub const SAMPLE_RATE: u32 = 22050;

/// Raw PCM sample format as understood by `aplay -f`.
pub const SAMPLE_FORMAT: &str = "S16_LE";

/// Mono output.
pub const CHANNELS: u16 = 1;

/// Mixer control unmuted before playback.
pub const MIXER_CONTROL: &str = "PCM";

/// Mixer volume in percent.
pub const MIXER_VOLUME: u8 = 100;

/// Number of synthesized sentences buffered ahead of playback.
///
/// Synthesis blocks once this many sentences are waiting to be played.
pub const AUDIO_BUFFER: usize = 3;

/// How long the binary waits for the pipeline to wind down after Ctrl+C.
pub const SHUTDOWN_GRACE_SECS: u64 = 2;
