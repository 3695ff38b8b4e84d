use super::input_media::InputMedia;
use super::query_text::QueryText;

#[derive(Debug, Clone, Default)]
pub struct ConsultationRequest {
    pub audio: InputMedia,
    pub image: InputMedia,
    pub typed_text: Option<String>,
}

impl ConsultationRequest {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            typed_text: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn with_audio(mut self, audio: InputMedia) -> Self {
        self.audio = audio;
        self
    }

    pub fn with_image(mut self, image: InputMedia) -> Self {
        self.image = image;
        self
    }

    /// Typed text takes precedence over audio when it is non-blank.
    pub fn typed_query(&self) -> Option<QueryText> {
        self.typed_text.as_deref().and_then(QueryText::parse)
    }
}
