use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use crate::application::ports::{AudioPlayer, VoiceError};

/// Plays audio by invoking an external player, `ffplay` by default.
pub struct CommandAudioPlayer {
    program: String,
    args: Vec<String>,
}

impl CommandAudioPlayer {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

#[async_trait]
impl AudioPlayer for CommandAudioPlayer {
    async fn play(&self, path: &Path) -> Result<(), VoiceError> {
        tracing::debug!(program = %self.program, path = %path.display(), "Playing audio");

        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .status()
            .await
            .map_err(|e| VoiceError::PlaybackFailed(format!("{}: {}", self.program, e)))?;

        if !status.success() {
            return Err(VoiceError::PlaybackFailed(format!(
                "{} exited with {}",
                self.program, status
            )));
        }

        Ok(())
    }
}
