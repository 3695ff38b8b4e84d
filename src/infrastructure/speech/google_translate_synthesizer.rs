use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use reqwest::Client;

use crate::application::ports::{SpeechSynthesizer, SynthesizedAudio, VoiceError};

/// The endpoint rejects requests longer than this many characters.
const MAX_CHUNK_CHARS: usize = 100;

/// Keyless Google Translate speech endpoint, used when no primary voice is
/// configured or the primary fails.
pub struct GoogleTranslateSynthesizer {
    client: Client,
    base_url: String,
    language: String,
}

impl GoogleTranslateSynthesizer {
    pub fn new(base_url: &str, language: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            language: language.to_string(),
        }
    }

    async fn fetch_chunk(&self, chunk: &str, idx: usize, total: usize) -> Result<Bytes, VoiceError> {
        let url = format!("{}/translate_tts", self.base_url);
        let idx = idx.to_string();
        let total = total.to_string();
        let textlen = chunk.chars().count().to_string();

        let response = self
            .client
            .get(&url)
            .query(&[
                ("ie", "UTF-8"),
                ("client", "tw-ob"),
                ("tl", self.language.as_str()),
                ("q", chunk),
                ("idx", idx.as_str()),
                ("total", total.as_str()),
                ("textlen", textlen.as_str()),
            ])
            .send()
            .await
            .map_err(|e| VoiceError::SynthesisFailed(format!("request: {}", e)))?;

        if !response.status().is_success() {
            return Err(VoiceError::SynthesisFailed(format!(
                "translate_tts returned {} for chunk {}",
                response.status(),
                idx
            )));
        }

        response
            .bytes()
            .await
            .map_err(|e| VoiceError::SynthesisFailed(format!("read body: {}", e)))
    }
}

#[async_trait]
impl SpeechSynthesizer for GoogleTranslateSynthesizer {
    async fn synthesize(&self, text: &str) -> Result<SynthesizedAudio, VoiceError> {
        let chunks = split_for_tts(text, MAX_CHUNK_CHARS);
        if chunks.is_empty() {
            return Err(VoiceError::SynthesisFailed("nothing to speak".to_string()));
        }

        // MP3 frames are self-delimiting, so segments concatenate into one playable stream.
        let mut audio = BytesMut::new();
        for (idx, chunk) in chunks.iter().enumerate() {
            let segment = self.fetch_chunk(chunk, idx, chunks.len()).await?;
            audio.extend_from_slice(&segment);
        }

        tracing::debug!(
            chunks = chunks.len(),
            bytes = audio.len(),
            language = %self.language,
            "Fallback synthesis completed"
        );
        Ok(SynthesizedAudio {
            data: audio.freeze(),
            extension: "mp3",
        })
    }

    fn name(&self) -> &str {
        "google-translate"
    }
}

/// Splits text on whitespace into chunks of at most `max_chars` characters.
/// Words longer than the limit are split mid-word.
pub fn split_for_tts(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let mut word_chars: Vec<char> = word.chars().collect();

        while word_chars.len() > max_chars {
            if current_len > 0 {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let rest = word_chars.split_off(max_chars);
            chunks.push(word_chars.into_iter().collect());
            word_chars = rest;
        }

        let word_len = word_chars.len();
        if word_len == 0 {
            continue;
        }

        let needed = if current_len == 0 { word_len } else { current_len + 1 + word_len };
        if needed > max_chars {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }

        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current.extend(word_chars);
        current_len += word_len;
    }

    if current_len > 0 {
        chunks.push(current);
    }

    chunks
}
