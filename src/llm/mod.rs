//! Sources of streamed text for the pipeline.
//!
//! Every source is an iterator of `Result<String>` fragments; an `Err`
//! item means the stream broke and nothing further will follow.

pub mod ollama;
pub mod source;

#[cfg(feature = "ollama")]
pub use ollama::OllamaClient;
pub use ollama::NdjsonTokens;
pub use source::{ReaderTokens, split_words};
