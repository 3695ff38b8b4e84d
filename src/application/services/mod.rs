mod consultation_service;
mod speaker;
mod temp_files;

pub use consultation_service::{
    AudioError, ConsultationError, ConsultationOutcome, ConsultationService,
    ConsultationTimeouts, Diagnosis, InputError,
};
pub use speaker::{SilentSpeaker, SynthesizingSpeaker};
pub use temp_files::{ScratchSpace, TempFiles};
