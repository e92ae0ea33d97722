//! Audio output: playback of synthesized PCM and mixer preparation.

pub mod aplay;
pub mod mixer;
pub mod player;

pub use aplay::{AplayPlayer, PcmFormat};
pub use mixer::Mixer;
pub use player::{AudioPlayer, CollectorPlayer};
