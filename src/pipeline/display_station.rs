//! Display worker: echoes raw fragments as they arrive.

use crate::pipeline::error::StationError;
use crate::pipeline::station::{Processed, Station};
use std::io::{self, Write};

/// Writes each fragment and flushes immediately, so text appears at
/// generation speed rather than in buffered bursts.
pub struct DisplayStation<W: Write + Send + 'static> {
    out: W,
}

impl<W: Write + Send + 'static> DisplayStation<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write + Send + 'static> Station for DisplayStation<W> {
    type Input = String;

    fn process(&mut self, fragment: String) -> Result<Processed, StationError> {
        let written = self
            .out
            .write_all(fragment.as_bytes())
            .and_then(|()| self.out.flush());

        match written {
            Ok(()) => Ok(Processed::Done),
            // Reader closed (e.g. `sayflow | head`); nothing more will get through
            Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
                Err(StationError::Fatal(format!("output closed: {}", e)))
            }
            Err(e) => Err(StationError::Recoverable(format!("write failed: {}", e))),
        }
    }

    fn name(&self) -> &'static str {
        "display"
    }

    fn shutdown(&mut self) {
        if let Err(e) = self.out.flush() {
            tracing::debug!("display flush on shutdown failed: {}", e);
        }
    }
}
