mod consultation;
mod health;
mod index;

pub use consultation::{ConsultationResponse, ErrorResponse, consultation_handler};
pub use health::{HealthResponse, health_handler};
pub use index::index_handler;
