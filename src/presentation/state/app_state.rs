use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::application::services::ConsultationService;
use crate::presentation::config::Settings;

#[derive(Clone)]
pub struct AppState {
    pub consultation_service: Arc<ConsultationService>,
    pub settings: Arc<Settings>,
    /// Cancelled on shutdown; every consultation runs under a child token.
    pub shutdown: CancellationToken,
}

impl AppState {
    pub fn new(consultation_service: Arc<ConsultationService>, settings: Settings) -> Self {
        Self {
            consultation_service,
            settings: Arc::new(settings),
            shutdown: CancellationToken::new(),
        }
    }
}
