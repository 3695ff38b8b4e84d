#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosisResult {
    pub text: String,
}

impl DiagnosisResult {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}
