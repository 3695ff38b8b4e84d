mod consultation_request;
mod consultation_stage;
mod diagnosis;
mod diagnosis_prompt;
mod input_media;
mod normalized_input;
mod query_text;

pub use consultation_request::ConsultationRequest;
pub use consultation_stage::ConsultationStage;
pub use diagnosis::DiagnosisResult;
pub use diagnosis_prompt::DiagnosisPrompt;
pub use input_media::InputMedia;
pub use normalized_input::NormalizedInput;
pub use query_text::QueryText;
