//! Token sources that need no network: word splitting and line readers.

use crate::error::{Result, SayflowError};
use std::collections::VecDeque;
use std::io::BufRead;

/// Splits `text` into word fragments, each carrying its trailing whitespace.
///
/// Concatenating the fragments gives back `text` exactly, which makes this a
/// stand-in for a model that streams one word at a time.
pub fn split_words(text: &str) -> Vec<String> {
    let mut fragments = Vec::new();
    let mut current = String::new();
    let mut in_space = false;

    for c in text.chars() {
        if c.is_whitespace() {
            in_space = true;
        } else if in_space {
            fragments.push(std::mem::take(&mut current));
            in_space = false;
        }
        current.push(c);
    }
    if !current.is_empty() {
        fragments.push(current);
    }
    fragments
}

/// Streams a reader word by word, one line at a time.
///
/// A line is split as soon as it is complete, so piping another program's
/// output through stdin is spoken while it is still running. Fragments keep
/// their whitespace, newlines included.
pub struct ReaderTokens<R: BufRead> {
    reader: R,
    pending: VecDeque<String>,
    finished: bool,
}

impl<R: BufRead> ReaderTokens<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            pending: VecDeque::new(),
            finished: false,
        }
    }
}

impl<R: BufRead> Iterator for ReaderTokens<R> {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(word) = self.pending.pop_front() {
                return Some(Ok(word));
            }
            if self.finished {
                return None;
            }
            let mut line = String::new();
            match self.reader.read_line(&mut line) {
                Ok(0) => self.finished = true,
                Ok(_) => self.pending.extend(split_words(&line)),
                Err(e) => {
                    self.finished = true;
                    return Some(Err(SayflowError::TokenStream {
                        message: format!("Failed to read input: {}", e),
                    }));
                }
            }
        }
    }
}
