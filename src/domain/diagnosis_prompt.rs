use super::query_text::QueryText;

const INSTRUCTIONS: &str = "You are acting as a professional doctor for learning purposes. \
Analyze the patient's concern below and respond in plain prose, without markdown or lists, \
as if speaking directly to the patient. Keep the answer to a few short paragraphs: \
state what the condition most likely is, then suggest remedies and when to seek in-person care.";

const IMAGE_NOTE: &str =
    "An image of the affected area is attached. Take what you observe in it into account.";

/// Fixed consultation prompt embedding the patient's query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosisPrompt(String);

impl DiagnosisPrompt {
    pub fn new(query: &QueryText, has_image: bool) -> Self {
        let mut rendered = format!("{INSTRUCTIONS}\n\nPatient query: {}", query.as_str());
        if has_image {
            rendered.push('\n');
            rendered.push_str(IMAGE_NOTE);
        }
        Self(rendered)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
