pub mod audio_decoder;
mod openai_whisper_engine;
mod symphonia_audio_normalizer;

pub use openai_whisper_engine::OpenAiWhisperEngine;
pub use symphonia_audio_normalizer::SymphoniaAudioNormalizer;
