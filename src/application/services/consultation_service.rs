use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::application::ports::{
    AudioNormalizeError, AudioNormalizer, DiagnosisClient, DiagnosisError, ImageStager,
    ImageStagingError, Speaker, TranscriptionEngine, TranscriptionError,
};
use crate::domain::{
    ConsultationRequest, ConsultationStage, DiagnosisResult, InputMedia, NormalizedInput,
    QueryText,
};
use crate::infrastructure::observability::sanitize_prompt;

use super::temp_files::{ScratchSpace, TempFiles};

const IMAGE_DEGRADED_NOTE: &str = "Note: the uploaded image could not be processed, \
so this analysis is based on your description only.";

#[derive(Debug, Clone, Copy)]
pub struct ConsultationTimeouts {
    pub transcription: Duration,
    pub diagnosis: Duration,
}

impl Default for ConsultationTimeouts {
    fn default() -> Self {
        Self {
            transcription: Duration::from_secs(60),
            diagnosis: Duration::from_secs(120),
        }
    }
}

/// Runs one consultation end to end: resolve the query, stage the image,
/// diagnose, hand the answer to the speaker.
pub struct ConsultationService {
    normalizer: Arc<dyn AudioNormalizer>,
    transcriber: Arc<dyn TranscriptionEngine>,
    image_stager: Arc<dyn ImageStager>,
    diagnosis_client: Arc<dyn DiagnosisClient>,
    speaker: Arc<dyn Speaker>,
    scratch: ScratchSpace,
    timeouts: ConsultationTimeouts,
}

impl ConsultationService {
    pub fn new(
        normalizer: Arc<dyn AudioNormalizer>,
        transcriber: Arc<dyn TranscriptionEngine>,
        image_stager: Arc<dyn ImageStager>,
        diagnosis_client: Arc<dyn DiagnosisClient>,
        speaker: Arc<dyn Speaker>,
        scratch: ScratchSpace,
    ) -> Self {
        Self {
            normalizer,
            transcriber,
            image_stager,
            diagnosis_client,
            speaker,
            scratch,
            timeouts: ConsultationTimeouts::default(),
        }
    }

    pub fn with_timeouts(mut self, timeouts: ConsultationTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    pub async fn consult(&self, request: ConsultationRequest) -> ConsultationOutcome {
        self.consult_with_cancellation(request, CancellationToken::new())
            .await
    }

    #[tracing::instrument(
        skip_all,
        fields(
            run_id = %Uuid::new_v4(),
            has_text = request.typed_text.is_some(),
            has_audio = request.audio.is_present(),
            has_image = request.image.is_present()
        )
    )]
    pub async fn consult_with_cancellation(
        &self,
        request: ConsultationRequest,
        cancel: CancellationToken,
    ) -> ConsultationOutcome {
        let mut run = RunContext::new(&self.scratch);

        let result = AssertUnwindSafe(self.run(&request, &mut run, &cancel))
            .catch_unwind()
            .await;

        let removed = run.temp_files.cleanup();
        tracing::debug!(removed, "Temporary files cleaned up");

        match result {
            Ok(Ok(diagnosis)) => {
                tracing::info!(
                    chars = diagnosis.result.text.len(),
                    image_degraded = diagnosis.image_issue.is_some(),
                    "Consultation completed"
                );
                ConsultationOutcome::Diagnosed(diagnosis)
            }
            Ok(Err(error)) => {
                tracing::warn!(stage = %error.stage(), error = %error, "Consultation failed");
                ConsultationOutcome::Failed(error)
            }
            Err(panic) => {
                let reason = panic_reason(panic.as_ref());
                tracing::error!(stage = %run.stage, reason = %reason, "Consultation aborted by panic");
                ConsultationOutcome::Failed(ConsultationError::System {
                    stage: run.stage,
                    reason,
                })
            }
        }
    }

    async fn run(
        &self,
        request: &ConsultationRequest,
        run: &mut RunContext,
        cancel: &CancellationToken,
    ) -> Result<Diagnosis, ConsultationError> {
        run.enter(ConsultationStage::ResolvingInput);
        let query_text = self.resolve_query(request, run, cancel).await?;

        let (image_ref, image_issue) = self.stage_image(&request.image, run).await;
        let input = NormalizedInput {
            query_text,
            image_ref,
        };

        run.enter(ConsultationStage::Diagnosing);
        tracing::debug!(
            query = %sanitize_prompt(input.query_text.as_str()),
            with_image = input.image_ref.is_some(),
            "Requesting diagnosis"
        );
        let result = self
            .suspend(
                ConsultationStage::Diagnosing,
                self.timeouts.diagnosis,
                cancel,
                self.diagnosis_client
                    .diagnose(&input.query_text, input.image_ref.as_deref()),
            )
            .await??;

        run.enter(ConsultationStage::Speaking);
        self.speaker.speak(&result.text);

        run.enter(ConsultationStage::Done);
        Ok(Diagnosis {
            result,
            image_issue,
        })
    }

    async fn resolve_query(
        &self,
        request: &ConsultationRequest,
        run: &mut RunContext,
        cancel: &CancellationToken,
    ) -> Result<QueryText, ConsultationError> {
        if let Some(query) = request.typed_query() {
            tracing::debug!("Using typed text, transcription skipped");
            return Ok(query);
        }

        if !request.audio.is_present() {
            return Err(InputError::NoQuery.into());
        }

        run.enter(ConsultationStage::Transcribing);
        let transcript = self.transcribe(&request.audio, run, cancel).await?;

        QueryText::parse(&transcript).ok_or(AudioError::Unintelligible.into())
    }

    async fn transcribe(
        &self,
        audio: &InputMedia,
        run: &mut RunContext,
        cancel: &CancellationToken,
    ) -> Result<String, ConsultationError> {
        let wav_path = run.temp_files.allocate("wav");

        self.normalizer
            .normalize(audio, &wav_path)
            .await
            .map_err(AudioError::Normalize)?;

        let wav = tokio::fs::read(&wav_path).await.map_err(AudioError::Read)?;

        let transcript = self
            .suspend(
                ConsultationStage::Transcribing,
                self.timeouts.transcription,
                cancel,
                self.transcriber.transcribe(&wav),
            )
            .await?
            .map_err(AudioError::Transcription)?;

        tracing::debug!(chars = transcript.len(), "Audio transcribed");
        Ok(transcript)
    }

    /// Image failures degrade the run instead of failing it.
    async fn stage_image(
        &self,
        image: &InputMedia,
        run: &mut RunContext,
    ) -> (Option<PathBuf>, Option<ImageStagingError>) {
        if !image.is_present() {
            return (None, None);
        }

        run.enter(ConsultationStage::StagingImage);
        let destination = run.temp_files.allocate("jpg");

        match self.image_stager.stage(image, &destination).await {
            Ok(staged) => (staged, None),
            Err(e) => {
                tracing::warn!(error = %e, "Image staging failed, continuing without image");
                (None, Some(e))
            }
        }
    }

    async fn suspend<T>(
        &self,
        stage: ConsultationStage,
        limit: Duration,
        cancel: &CancellationToken,
        call: impl Future<Output = T>,
    ) -> Result<T, ConsultationError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(ConsultationError::Cancelled(stage)),
            outcome = tokio::time::timeout(limit, call) => {
                outcome.map_err(|_| ConsultationError::Timeout { stage, after: limit })
            }
        }
    }
}

struct RunContext {
    stage: ConsultationStage,
    temp_files: TempFiles,
}

impl RunContext {
    fn new(scratch: &ScratchSpace) -> Self {
        Self {
            stage: ConsultationStage::Idle,
            temp_files: TempFiles::new(scratch),
        }
    }

    fn enter(&mut self, stage: ConsultationStage) {
        tracing::debug!(from = %self.stage, to = %stage, "Stage transition");
        self.stage = stage;
    }
}

fn panic_reason(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unexpected internal fault".to_string()
    }
}

#[derive(Debug)]
pub struct Diagnosis {
    pub result: DiagnosisResult,
    /// Set when an image was supplied but could not be staged.
    pub image_issue: Option<ImageStagingError>,
}

impl Diagnosis {
    pub fn message(&self) -> String {
        match self.image_issue {
            Some(_) => format!("{}\n\n{}", self.result.text, IMAGE_DEGRADED_NOTE),
            None => self.result.text.clone(),
        }
    }
}

#[derive(Debug)]
pub enum ConsultationOutcome {
    Diagnosed(Diagnosis),
    Failed(ConsultationError),
}

impl ConsultationOutcome {
    /// Text shown to the user: the diagnosis or a readable failure.
    pub fn message(&self) -> String {
        match self {
            Self::Diagnosed(diagnosis) => diagnosis.message(),
            Self::Failed(error) => error.user_message(),
        }
    }

    pub fn is_diagnosed(&self) -> bool {
        matches!(self, Self::Diagnosed(_))
    }

    pub fn stage(&self) -> ConsultationStage {
        match self {
            Self::Diagnosed(_) => ConsultationStage::Done,
            Self::Failed(error) => error.stage(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("no query provided")]
    NoQuery,
}

#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("normalization: {0}")]
    Normalize(AudioNormalizeError),
    #[error("reading normalized audio: {0}")]
    Read(std::io::Error),
    #[error("transcription: {0}")]
    Transcription(TranscriptionError),
    #[error("unintelligible")]
    Unintelligible,
}

#[derive(Debug, thiserror::Error)]
pub enum ConsultationError {
    #[error("input: {0}")]
    Input(#[from] InputError),
    #[error("audio: {0}")]
    Audio(#[from] AudioError),
    #[error("diagnosis: {0}")]
    Diagnosis(#[from] DiagnosisError),
    #[error("{stage} timed out after {after:?}")]
    Timeout {
        stage: ConsultationStage,
        after: Duration,
    },
    #[error("cancelled during {0}")]
    Cancelled(ConsultationStage),
    #[error("system error during {stage}: {reason}")]
    System {
        stage: ConsultationStage,
        reason: String,
    },
}

impl ConsultationError {
    pub fn stage(&self) -> ConsultationStage {
        match self {
            Self::Input(_) => ConsultationStage::ResolvingInput,
            Self::Audio(_) => ConsultationStage::Transcribing,
            Self::Diagnosis(_) => ConsultationStage::Diagnosing,
            Self::Timeout { stage, .. } | Self::Cancelled(stage) | Self::System { stage, .. } => {
                *stage
            }
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            Self::Input(InputError::NoQuery) => {
                "Please describe your symptoms using voice or text.".to_string()
            }
            Self::Audio(AudioError::Unintelligible) => {
                "Could not transcribe audio. Please try again or type your symptoms.".to_string()
            }
            Self::Audio(e) => format!("Audio error: {}", e),
            Self::Diagnosis(e) => format!("Analysis failed: {}", e),
            Self::Timeout { stage, .. } => {
                format!("The {} step timed out. Please try again.", stage.describe())
            }
            Self::Cancelled(stage) => {
                format!("The consultation was cancelled during {}.", stage.describe())
            }
            Self::System { reason, .. } => format!("System error: {}", reason),
        }
    }
}
