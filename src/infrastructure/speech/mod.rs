mod command_audio_player;
mod elevenlabs_synthesizer;
mod google_translate_synthesizer;

pub use command_audio_player::CommandAudioPlayer;
pub use elevenlabs_synthesizer::ElevenLabsSynthesizer;
pub use google_translate_synthesizer::{GoogleTranslateSynthesizer, split_for_tts};
