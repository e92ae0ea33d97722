//! Sentence to audio synthesis.

pub mod piper;
pub mod synthesizer;

pub use piper::{PiperConfig, PiperSynthesizer};
pub use synthesizer::{MockSynthesizer, Synthesizer};
