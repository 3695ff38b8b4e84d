mod diagnosis_client_factory;
mod gemini_diagnosis_client;
mod image_payload;
mod openai_diagnosis_client;

pub use diagnosis_client_factory::DiagnosisClientFactory;
pub use gemini_diagnosis_client::GeminiDiagnosisClient;
pub use openai_diagnosis_client::OpenAiDiagnosisClient;
