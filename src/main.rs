use std::sync::Arc;

use tokio::net::TcpListener;

use medivox::application::ports::{Speaker, SpeechSynthesizer};
use medivox::application::services::{
    ConsultationService, ConsultationTimeouts, ScratchSpace, SilentSpeaker, SynthesizingSpeaker,
};
use medivox::infrastructure::audio::{OpenAiWhisperEngine, SymphoniaAudioNormalizer};
use medivox::infrastructure::image::JpegImageStager;
use medivox::infrastructure::llm::DiagnosisClientFactory;
use medivox::infrastructure::observability::init_tracing;
use medivox::infrastructure::speech::{
    CommandAudioPlayer, ElevenLabsSynthesizer, GoogleTranslateSynthesizer,
};
use medivox::presentation::config::SpeechSettings;
use medivox::presentation::{AppState, Environment, Settings, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment = Environment::from_env().map_err(anyhow::Error::msg)?;
    let settings = Settings::load(environment)?;

    init_tracing(&settings.logging, environment);

    let scratch = ScratchSpace::new(settings.scratch.resolve_directory())?;
    tracing::info!(directory = %scratch.directory().display(), "Scratch space ready");

    let transcription_key = settings.transcription.api_key.clone().unwrap_or_default();
    if transcription_key.is_empty() {
        tracing::warn!("No transcription API key configured, voice input will fail");
    }
    let transcriber = Arc::new(OpenAiWhisperEngine::new(
        transcription_key,
        settings.transcription.base_url.clone(),
        settings.transcription.model.clone(),
    ));

    let diagnosis_client = DiagnosisClientFactory::create(&settings.diagnosis)?;
    let speaker = build_speaker(&settings.speech, &scratch);

    let consultation_service = ConsultationService::new(
        Arc::new(SymphoniaAudioNormalizer),
        transcriber,
        Arc::new(JpegImageStager::default()),
        diagnosis_client,
        speaker,
        scratch,
    )
    .with_timeouts(ConsultationTimeouts {
        transcription: settings.transcription.timeout(),
        diagnosis: settings.diagnosis.timeout(),
    });

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let state = AppState::new(Arc::new(consultation_service), settings);
    let shutdown = state.shutdown.clone();
    let router = create_router(state);

    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Listening on http://{}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for shutdown signal");
                return;
            }
            tracing::info!("Shutdown requested, cancelling in-flight consultations");
            shutdown.cancel();
        })
        .await?;

    Ok(())
}

fn build_speaker(settings: &SpeechSettings, scratch: &ScratchSpace) -> Arc<dyn Speaker> {
    if !settings.enabled {
        tracing::info!("Voice output disabled");
        return Arc::new(SilentSpeaker);
    }

    let primary: Option<Arc<dyn SpeechSynthesizer>> = settings
        .elevenlabs_api_key
        .as_deref()
        .filter(|key| !key.is_empty())
        .map(|key| {
            Arc::new(ElevenLabsSynthesizer::new(
                key,
                &settings.elevenlabs_base_url,
                &settings.voice_id,
                &settings.model_id,
            )) as Arc<dyn SpeechSynthesizer>
        });

    if primary.is_none() {
        tracing::info!("No ElevenLabs key configured, using fallback voice only");
    }

    let fallback = Arc::new(GoogleTranslateSynthesizer::new(
        &settings.fallback_base_url,
        &settings.fallback_language,
    ));
    let player = Arc::new(CommandAudioPlayer::new(
        settings.player_command.clone(),
        settings.player_args.clone(),
    ));

    Arc::new(
        SynthesizingSpeaker::new(primary, fallback, player, scratch.clone())
            .with_synthesis_timeout(settings.synthesis_timeout()),
    )
}
