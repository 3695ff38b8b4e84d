#[derive(Debug, thiserror::Error)]
pub enum VoiceError {
    #[error("speech synthesis failed: {0}")]
    SynthesisFailed(String),
    #[error("synthesis timed out")]
    Timeout,
    #[error("playback failed: {0}")]
    PlaybackFailed(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
