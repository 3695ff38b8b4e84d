mod audio_normalizer;
mod audio_player;
mod diagnosis_client;
mod image_stager;
mod speaker;
mod speech_synthesizer;
mod transcription_engine;
mod voice_error;

pub use audio_normalizer::{AudioNormalizeError, AudioNormalizer};
pub use audio_player::AudioPlayer;
pub use diagnosis_client::{DiagnosisClient, DiagnosisError};
pub use image_stager::{ImageStager, ImageStagingError};
pub use speaker::Speaker;
pub use speech_synthesizer::{SpeechSynthesizer, SynthesizedAudio};
pub use transcription_engine::{TranscriptionEngine, TranscriptionError};
pub use voice_error::VoiceError;
