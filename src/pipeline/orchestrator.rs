//! Speech pipeline: token stream → sentences → audio → speaker.
//!
//! The calling thread is the producer: it receives tokens, segments them
//! and synthesizes each sentence. Two station threads consume its output,
//! one playing audio, one echoing text. The token iterator itself is driven
//! on a reader thread, so a source stuck in a blocking read never hides a
//! cancellation from the producer. A `ShutdownGuard` owns both queue
//! senders, so every way out of the producer loop (end of stream, stream
//! error, cancellation, panic) delivers the end markers and lets both
//! stations exit.

use crate::audio::player::AudioPlayer;
use crate::config::Config;
use crate::defaults;
use crate::error::{Result, SayflowError};
use crate::pipeline::display_station::DisplayStation;
use crate::pipeline::error::{ErrorReporter, LogReporter, StationError};
use crate::pipeline::playback_station::PlaybackStation;
use crate::pipeline::queue::{self, QueueSender};
use crate::pipeline::station::{StationReport, StationRunner};
use crate::pipeline::types::{CancelToken, RunSummary, SpokenSentence};
use crate::segmenter::SentenceSegmenter;
use crate::tts::synthesizer::Synthesizer;
use crossbeam_channel::{Receiver, RecvTimeoutError};
use std::io::Write;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// How often the producer rechecks the cancel token while waiting for a token.
const CANCEL_POLL: Duration = Duration::from_millis(20);

/// Configuration for the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Capacity of the audio queue between synthesis and playback.
    pub audio_buffer: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            audio_buffer: defaults::AUDIO_BUFFER,
        }
    }
}

impl From<&Config> for PipelineConfig {
    fn from(config: &Config) -> Self {
        Self {
            audio_buffer: config.pipeline.audio_buffer,
        }
    }
}

/// Pushes both end markers when dropped, unless already pushed.
struct ShutdownGuard {
    audio: QueueSender<SpokenSentence>,
    display: QueueSender<String>,
}

impl Drop for ShutdownGuard {
    fn drop(&mut self) {
        self.display.close();
        self.audio.close();
    }
}

/// Outcome of waiting for the next token.
enum Pull {
    Token(Result<String>),
    Exhausted,
    Cancelled,
}

/// Drives a token iterator on its own thread.
///
/// The channel has no capacity, so at most one token is pulled ahead of the
/// producer. Once the receiver is gone the next send fails and the thread
/// stops pulling. A thread still blocked inside the iterator when the run
/// is cancelled is left detached.
struct TokenReader {
    tokens: Receiver<Result<String>>,
    handle: Option<JoinHandle<()>>,
}

impl TokenReader {
    fn spawn<T>(tokens: T) -> Result<Self>
    where
        T: Iterator<Item = Result<String>> + Send + 'static,
    {
        let (tx, rx) = crossbeam_channel::bounded(0);
        let handle = thread::Builder::new()
            .name("sayflow-tokens".to_string())
            .spawn(move || {
                for token in tokens {
                    if tx.send(token).is_err() {
                        break;
                    }
                }
            })?;
        Ok(Self {
            tokens: rx,
            handle: Some(handle),
        })
    }

    /// Waits for the next token, giving up as soon as `cancel` is set.
    fn next(&self, cancel: &CancelToken) -> Pull {
        loop {
            if cancel.is_cancelled() {
                return Pull::Cancelled;
            }
            match self.tokens.recv_timeout(CANCEL_POLL) {
                Ok(token) => return Pull::Token(token),
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => return Pull::Exhausted,
            }
        }
    }

    /// Joins the reader after the stream is exhausted.
    ///
    /// Returns the panic message if the iterator panicked.
    fn finish(&mut self) -> Option<String> {
        let handle = self.handle.take()?;
        match handle.join() {
            Ok(()) => None,
            Err(panic) => Some(
                panic
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string()),
            ),
        }
    }
}

/// Streaming speech pipeline.
pub struct Pipeline {
    config: PipelineConfig,
    error_reporter: Arc<dyn ErrorReporter>,
    cancel: CancelToken,
}

impl Pipeline {
    /// Creates a new pipeline with the default error reporter.
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            error_reporter: Arc::new(LogReporter),
            cancel: CancelToken::new(),
        }
    }

    /// Sets a custom error reporter.
    pub fn with_error_reporter(mut self, reporter: Arc<dyn ErrorReporter>) -> Self {
        self.error_reporter = reporter;
        self
    }

    /// Uses `token` to stop the run early.
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = token;
        self
    }

    /// Token that cancels this pipeline's runs.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Speaks `tokens` until the stream ends, fails, or the run is cancelled.
    ///
    /// Blocks the calling thread, which does segmentation and synthesis.
    /// Every fragment is echoed to `display`; every synthesized sentence is
    /// played on `player` in order. Per-sentence failures are reported and
    /// skipped. A panic inside the token iterator ends the stream like an
    /// upstream error. Returns once both workers have exited, also when the
    /// run is cancelled while the source is blocked.
    pub fn run<I, W>(
        &self,
        tokens: I,
        synthesizer: &dyn Synthesizer,
        player: Box<dyn AudioPlayer>,
        display: W,
    ) -> Result<RunSummary>
    where
        I: IntoIterator<Item = Result<String>>,
        I::IntoIter: Send + 'static,
        W: Write + Send + 'static,
    {
        if self.config.audio_buffer == 0 {
            return Err(SayflowError::ConfigInvalidValue {
                key: "pipeline.audio_buffer".to_string(),
                message: "must be at least 1".to_string(),
            });
        }

        let started = Instant::now();
        let player_name = player.name();
        let (audio_tx, audio_rx) = queue::bounded(self.config.audio_buffer);
        let (display_tx, display_rx) = queue::unbounded();
        let guard = ShutdownGuard {
            audio: audio_tx,
            display: display_tx,
        };

        let playback = StationRunner::spawn(
            PlaybackStation::new(player).with_cancel_token(self.cancel.clone()),
            audio_rx,
            self.error_reporter.clone(),
        )?;
        let display = StationRunner::spawn(
            DisplayStation::new(display),
            display_rx,
            self.error_reporter.clone(),
        )?;

        let mut summary = RunSummary::default();
        let mut segmenter = SentenceSegmenter::new();
        let mut reader = TokenReader::spawn(tokens.into_iter())?;

        tracing::debug!(
            audio_buffer = self.config.audio_buffer,
            synthesizer = synthesizer.name(),
            player = player_name,
            "pipeline started"
        );

        'stream: loop {
            let token = match reader.next(&self.cancel) {
                Pull::Token(Ok(token)) => token,
                Pull::Token(Err(e)) => {
                    self.error_reporter
                        .report("producer", &StationError::Fatal(e.to_string()));
                    summary.upstream_error = Some(e.to_string());
                    break;
                }
                Pull::Exhausted => {
                    if let Some(panic) = reader.finish() {
                        let message = format!("token source panicked: {}", panic);
                        self.error_reporter
                            .report("producer", &StationError::Fatal(message.clone()));
                        summary.upstream_error = Some(message);
                    }
                    break;
                }
                Pull::Cancelled => break,
            };
            summary.tokens += 1;

            if guard.display.put(token.clone()).is_err() {
                tracing::trace!("display stopped, fragment not echoed");
            }

            for sentence in segmenter.add_text(&token) {
                if self.cancel.is_cancelled() {
                    break 'stream;
                }
                self.speak(sentence, synthesizer, &guard.audio, started, &mut summary);
            }
        }

        if !self.cancel.is_cancelled()
            && let Some(remainder) = segmenter.flush()
        {
            self.speak(remainder, synthesizer, &guard.audio, started, &mut summary);
        }

        drop(guard);

        let playback_report = self.join_station(playback);
        let display_report = self.join_station(display);

        summary.played = playback_report.processed;
        summary.playback_failures = playback_report.failed;
        summary.playback_skipped = playback_report.skipped;
        summary.displayed = display_report.processed;
        summary.cancelled = self.cancel.is_cancelled();
        summary.clean_shutdown = playback_report.end_received && display_report.end_received;
        summary.elapsed = started.elapsed();

        tracing::debug!(%summary, "pipeline finished");
        Ok(summary)
    }

    /// Synthesizes one sentence and queues it for playback.
    fn speak(
        &self,
        text: String,
        synthesizer: &dyn Synthesizer,
        audio_queue: &QueueSender<SpokenSentence>,
        started: Instant,
        summary: &mut RunSummary,
    ) {
        let sequence = summary.sentences;
        summary.sentences += 1;

        let synthesis_start = Instant::now();
        let audio = match synthesizer.synthesize(&text) {
            Ok(audio) => audio,
            Err(e) => {
                summary.synthesis_failures += 1;
                self.error_reporter.report(
                    "synthesizer",
                    &StationError::Recoverable(format!("sentence {} skipped: {}", sequence, e)),
                );
                return;
            }
        };
        tracing::debug!(
            sequence,
            bytes = audio.len(),
            synthesis_ms = synthesis_start.elapsed().as_millis() as u64,
            text = %text,
            "synthesized"
        );

        // Blocks here while playback is `audio_buffer` sentences behind
        match audio_queue.put(SpokenSentence::new(sequence, text, audio)) {
            Ok(()) => {
                summary.synthesized += 1;
                summary.first_audio.get_or_insert_with(|| started.elapsed());
            }
            Err(e) => self.error_reporter.report(
                "producer",
                &StationError::Recoverable(format!("sentence {} dropped: {}", sequence, e)),
            ),
        }
    }

    fn join_station(&self, runner: StationRunner) -> StationReport {
        let name = runner.name();
        runner.join().unwrap_or_else(|msg| {
            self.error_reporter.report(name, &StationError::Fatal(msg));
            StationReport::default()
        })
    }
}
