mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{
    BlockThreshold, DiagnosisProvider, DiagnosisSettings, LoggingSettings, SafetySettings,
    ScratchSettings, ServerSettings, Settings, SettingsError, SpeechSettings,
    TranscriptionSettings,
};
