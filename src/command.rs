//! External command execution with testable stdin/stdout plumbing.
//!
//! Piper, aplay and amixer are all driven the same way: spawn, write bytes to
//! stdin, close it, collect stdout, check the exit status. The
//! `CommandExecutor` trait lets every adapter be tested without the binaries.

use crate::error::{Result, SayflowError};
use std::collections::VecDeque;
use std::io::Write;
use std::process::{Command, Stdio};
use std::sync::Mutex;
use std::thread;

/// Trait for executing system commands.
///
/// Object-safe, Send + Sync so one executor can be shared by the producer
/// and the playback worker.
pub trait CommandExecutor: Send + Sync {
    /// Run `command` with `args`, feeding `input` on stdin.
    ///
    /// Returns the raw stdout on success. Fails if the command cannot be
    /// spawned or exits with a nonzero status.
    fn execute(&self, command: &str, args: &[&str], input: &[u8]) -> Result<Vec<u8>>;
}

/// Production command executor using std::process::Command.
#[derive(Debug, Clone, Default)]
pub struct SystemCommandExecutor;

impl SystemCommandExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl CommandExecutor for SystemCommandExecutor {
    fn execute(&self, command: &str, args: &[&str], input: &[u8]) -> Result<Vec<u8>> {
        let mut child = Command::new(command)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => SayflowError::CommandNotFound {
                    command: command.to_string(),
                },
                std::io::ErrorKind::PermissionDenied => SayflowError::CommandPermissionDenied {
                    command: command.to_string(),
                    message: e.to_string(),
                },
                _ => SayflowError::CommandFailed {
                    command: command.to_string(),
                    message: format!("failed to start: {}", e),
                },
            })?;

        let stdin = child.stdin.take();

        // stdin is written from a second thread so a child that fills its
        // stdout pipe before reading all input cannot deadlock us.
        let (write_result, output) = thread::scope(|scope| {
            let writer = scope.spawn(move || -> std::io::Result<()> {
                if let Some(mut stdin) = stdin {
                    stdin.write_all(input)?;
                    stdin.flush()?;
                }
                Ok(())
            });
            let output = child.wait_with_output();
            let write_result = writer.join().unwrap_or_else(|_| {
                Err(std::io::Error::other("stdin writer thread panicked"))
            });
            (write_result, output)
        });

        let output = output.map_err(|e| SayflowError::CommandFailed {
            command: command.to_string(),
            message: format!("failed to collect output: {}", e),
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SayflowError::CommandFailed {
                command: command.to_string(),
                message: format!("exited with {}: {}", output.status, stderr.trim()),
            });
        }

        if let Err(e) = write_result {
            return Err(SayflowError::CommandFailed {
                command: command.to_string(),
                message: format!("failed to write stdin: {}", e),
            });
        }

        Ok(output.stdout)
    }
}

/// A recorded `execute` call: command, arguments and stdin bytes.
pub type RecordedCall = (String, Vec<String>, Vec<u8>);

/// Mock command executor for testing.
///
/// Records all calls and returns queued responses in order, falling back to
/// an empty successful output.
#[derive(Debug, Default)]
pub struct MockCommandExecutor {
    calls: Mutex<Vec<RecordedCall>>,
    responses: Mutex<VecDeque<Result<Vec<u8>>>>,
}

impl MockCommandExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful response.
    pub fn with_output(self, output: &[u8]) -> Self {
        self.responses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(Ok(output.to_vec()));
        self
    }

    /// Queue an error response.
    pub fn with_error(self, error: SayflowError) -> Self {
        self.responses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(Err(error));
        self
    }

    /// All recorded calls, oldest first.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

impl CommandExecutor for MockCommandExecutor {
    fn execute(&self, command: &str, args: &[&str], input: &[u8]) -> Result<Vec<u8>> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).push((
            command.to_string(),
            args.iter().map(|s| s.to_string()).collect(),
            input.to_vec(),
        ));

        self.responses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}
