//! Output device preparation via `amixer`.
//!
//! Runs once before a pipeline starts. A muted or silent PCM control is the
//! most common reason for "it ran but I heard nothing".

use crate::command::{CommandExecutor, SystemCommandExecutor};
use crate::error::Result;

pub struct Mixer<E: CommandExecutor = SystemCommandExecutor> {
    executor: E,
}

impl Mixer<SystemCommandExecutor> {
    pub fn system() -> Self {
        Self::new(SystemCommandExecutor::new())
    }
}

impl<E: CommandExecutor> Mixer<E> {
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    /// Unmute `control` and set it to `volume` percent.
    pub fn prepare(&self, control: &str, volume: u8) -> Result<()> {
        self.executor
            .execute("amixer", &["sset", control, "unmute"], b"")?;
        let level = format!("{}%", volume.min(100));
        self.executor
            .execute("amixer", &["sset", control, &level], b"")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::MockCommandExecutor;
    use crate::error::SayflowError;

    #[test]
    fn test_prepare_unmutes_then_sets_volume() {
        let mixer = Mixer::new(MockCommandExecutor::new());
        mixer.prepare("PCM", 80).unwrap();

        let calls = mixer.executor.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].0, "amixer");
        assert_eq!(calls[0].1, vec!["sset", "PCM", "unmute"]);
        assert_eq!(calls[1].1, vec!["sset", "PCM", "80%"]);
    }

    #[test]
    fn test_prepare_stops_at_first_failure() {
        let executor = MockCommandExecutor::new().with_error(SayflowError::CommandNotFound {
            command: "amixer".to_string(),
        });
        let mixer = Mixer::new(executor);

        assert!(mixer.prepare("Master", 100).is_err());
        assert_eq!(mixer.executor.call_count(), 1);
    }

    #[test]
    fn test_volume_is_capped() {
        let mixer = Mixer::new(MockCommandExecutor::new());
        mixer.prepare("PCM", 250).unwrap();
        assert_eq!(mixer.executor.calls()[1].1, vec!["sset", "PCM", "100%"]);
    }
}
