//! Ollama `/api/generate` streaming client.
//!
//! The endpoint answers with newline-delimited JSON objects, one per
//! generated token: `{"response": "Hel", "done": false}`. The last object
//! carries `"done": true`.

#[cfg(feature = "ollama")]
use crate::config::LlmConfig;
use crate::error::{Result, SayflowError};
use serde::Deserialize;
use std::io::BufRead;

#[derive(Debug, Deserialize)]
struct GenerateChunk {
    #[serde(default)]
    response: String,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    error: Option<String>,
}

/// Decodes an ndjson generate stream into text fragments.
///
/// Blank lines are skipped; a line with `"done": true` ends the stream after
/// its own fragment. Malformed lines and read failures surface once as a
/// `TokenStream` error, after which the iterator is exhausted.
pub struct NdjsonTokens<R: BufRead> {
    reader: R,
    finished: bool,
}

impl<R: BufRead> NdjsonTokens<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            finished: false,
        }
    }

    fn fail(&mut self, message: String) -> Option<Result<String>> {
        self.finished = true;
        Some(Err(SayflowError::TokenStream { message }))
    }
}

impl<R: BufRead> Iterator for NdjsonTokens<R> {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut line = String::new();
        while !self.finished {
            line.clear();
            match self.reader.read_line(&mut line) {
                Ok(0) => {
                    self.finished = true;
                    return None;
                }
                Ok(_) => {}
                Err(e) => return self.fail(format!("Failed to read LLM stream: {}", e)),
            }

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let chunk: GenerateChunk = match serde_json::from_str(trimmed) {
                Ok(chunk) => chunk,
                Err(e) => return self.fail(format!("Malformed LLM stream line: {}", e)),
            };
            if let Some(error) = chunk.error {
                return self.fail(format!("LLM reported an error: {}", error));
            }
            if chunk.done {
                self.finished = true;
            }
            if chunk.done && chunk.response.is_empty() {
                return None;
            }
            return Some(Ok(chunk.response));
        }
        None
    }
}

/// Request body for `/api/generate`.
pub fn generate_request(model: &str, prompt: &str) -> Result<String> {
    Ok(serde_json::to_string(&serde_json::json!({
        "model": model,
        "prompt": prompt,
        "stream": true,
    }))?)
}

/// Blocking client for a local Ollama server.
#[cfg(feature = "ollama")]
pub struct OllamaClient {
    url: String,
    model: String,
    client: reqwest::blocking::Client,
}

#[cfg(feature = "ollama")]
impl OllamaClient {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        // No overall timeout: a long answer streams for as long as it takes
        let client = reqwest::blocking::Client::builder()
            .connect_timeout(std::time::Duration::from_secs(5))
            .timeout(None)
            .build()?;
        Ok(Self {
            url: config.url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            client,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Starts generating an answer to `prompt` and returns its token stream.
    pub fn generate(
        &self,
        prompt: &str,
    ) -> Result<NdjsonTokens<std::io::BufReader<reqwest::blocking::Response>>> {
        let endpoint = format!("{}/api/generate", self.url);
        tracing::debug!(endpoint = %endpoint, model = %self.model, "requesting generation");

        let response = self
            .client
            .post(&endpoint)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(generate_request(&self.model, prompt)?)
            .send()
            .map_err(|e| SayflowError::TokenStream {
                message: format!("Failed to reach LLM at {}: {}", self.url, e),
            })?;

        if !response.status().is_success() {
            return Err(SayflowError::TokenStream {
                message: format!("LLM returned status {}", response.status()),
            });
        }

        Ok(NdjsonTokens::new(std::io::BufReader::new(response)))
    }

    /// True when the server answers on its base URL.
    pub fn is_reachable(&self) -> bool {
        self.client
            .get(&self.url)
            .timeout(std::time::Duration::from_secs(2))
            .send()
            .is_ok_and(|r| r.status().is_success())
    }
}
