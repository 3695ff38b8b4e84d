use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConsultationStage {
    Idle,
    ResolvingInput,
    Transcribing,
    StagingImage,
    Diagnosing,
    Speaking,
    Done,
}

impl ConsultationStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::ResolvingInput => "resolving_input",
            Self::Transcribing => "transcribing",
            Self::StagingImage => "staging_image",
            Self::Diagnosing => "diagnosing",
            Self::Speaking => "speaking",
            Self::Done => "done",
        }
    }

    /// Human wording used in user-facing messages.
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Idle | Self::ResolvingInput => "input",
            Self::Transcribing => "transcription",
            Self::StagingImage => "image",
            Self::Diagnosing => "analysis",
            Self::Speaking => "voice",
            Self::Done => "completion",
        }
    }
}

impl fmt::Display for ConsultationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
