use std::sync::Arc;
use std::time::Duration;

use crate::application::ports::{
    AudioPlayer, Speaker, SpeechSynthesizer, SynthesizedAudio, VoiceError,
};

use super::temp_files::{ScratchSpace, TempFiles};

const DEFAULT_SYNTHESIS_TIMEOUT: Duration = Duration::from_secs(30);

/// Speaks text through a primary synthesizer, falling back to a secondary one,
/// then plays the result locally. Runs detached from the caller.
#[derive(Clone)]
pub struct SynthesizingSpeaker {
    primary: Option<Arc<dyn SpeechSynthesizer>>,
    fallback: Arc<dyn SpeechSynthesizer>,
    player: Arc<dyn AudioPlayer>,
    scratch: ScratchSpace,
    synthesis_timeout: Duration,
}

impl SynthesizingSpeaker {
    pub fn new(
        primary: Option<Arc<dyn SpeechSynthesizer>>,
        fallback: Arc<dyn SpeechSynthesizer>,
        player: Arc<dyn AudioPlayer>,
        scratch: ScratchSpace,
    ) -> Self {
        Self {
            primary,
            fallback,
            player,
            scratch,
            synthesis_timeout: DEFAULT_SYNTHESIS_TIMEOUT,
        }
    }

    pub fn with_synthesis_timeout(mut self, timeout: Duration) -> Self {
        self.synthesis_timeout = timeout;
        self
    }

    /// Synthesizes, plays and removes one audio file. Awaited only by the
    /// background task spawned from [`Speaker::speak`].
    pub async fn speak_now(&self, text: &str) -> Result<(), VoiceError> {
        let audio = self.synthesize(text).await?;

        // Removed on drop, including when the task is aborted mid-playback.
        let mut files = TempFiles::new(&self.scratch);
        let path = files.allocate(audio.extension);
        tokio::fs::write(&path, &audio.data).await?;

        let played = self.player.play(&path).await;
        files.cleanup();
        played
    }

    async fn synthesize(&self, text: &str) -> Result<SynthesizedAudio, VoiceError> {
        if let Some(primary) = &self.primary {
            match self.bounded(primary.as_ref(), text).await {
                Ok(audio) => return Ok(audio),
                Err(e) => {
                    tracing::warn!(
                        provider = primary.name(),
                        fallback = self.fallback.name(),
                        error = %e,
                        "Primary speech synthesis failed, using fallback"
                    );
                }
            }
        }

        self.bounded(self.fallback.as_ref(), text).await
    }

    async fn bounded(
        &self,
        synthesizer: &dyn SpeechSynthesizer,
        text: &str,
    ) -> Result<SynthesizedAudio, VoiceError> {
        tokio::time::timeout(self.synthesis_timeout, synthesizer.synthesize(text))
            .await
            .map_err(|_| VoiceError::Timeout)?
    }
}

impl Speaker for SynthesizingSpeaker {
    fn speak(&self, text: &str) {
        if text.trim().is_empty() {
            return;
        }

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!("No async runtime available, skipping voice response");
            return;
        };

        let speaker = self.clone();
        let text = text.to_string();
        runtime.spawn(async move {
            match speaker.speak_now(&text).await {
                Ok(()) => tracing::debug!(chars = text.len(), "Voice response played"),
                Err(e) => tracing::warn!(error = %e, "Voice response failed"),
            }
        });
    }
}

/// Used when voice output is disabled.
pub struct SilentSpeaker;

impl Speaker for SilentSpeaker {
    fn speak(&self, text: &str) {
        tracing::debug!(chars = text.len(), "Voice output disabled, response not spoken");
    }
}
