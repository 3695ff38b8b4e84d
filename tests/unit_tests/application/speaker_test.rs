use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use bytes::Bytes;
use tokio::sync::mpsc;

use medivox::application::ports::{
    AudioPlayer, Speaker, SpeechSynthesizer, SynthesizedAudio, VoiceError,
};
use medivox::application::services::{ScratchSpace, SynthesizingSpeaker};

enum Behaviour {
    Speak(&'static [u8]),
    Fail,
    Hang,
}

struct MockSynthesizer {
    name: &'static str,
    behaviour: Behaviour,
    calls: AtomicUsize,
}

impl MockSynthesizer {
    fn new(name: &'static str, behaviour: Behaviour) -> Arc<Self> {
        Arc::new(Self {
            name,
            behaviour,
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait::async_trait]
impl SpeechSynthesizer for MockSynthesizer {
    async fn synthesize(&self, _text: &str) -> Result<SynthesizedAudio, VoiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.behaviour {
            Behaviour::Speak(data) => Ok(SynthesizedAudio {
                data: Bytes::from_static(data),
                extension: "mp3",
            }),
            Behaviour::Fail => Err(VoiceError::SynthesisFailed("quota exceeded".to_string())),
            Behaviour::Hang => {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Err(VoiceError::Timeout)
            }
        }
    }

    fn name(&self) -> &str {
        self.name
    }
}

#[derive(Debug, Clone)]
struct Played {
    path: PathBuf,
    contents: Vec<u8>,
}

struct RecordingPlayer {
    played: Mutex<Vec<Played>>,
    notify: Option<mpsc::UnboundedSender<Played>>,
    fail: bool,
}

impl RecordingPlayer {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            played: Mutex::new(Vec::new()),
            notify: None,
            fail: false,
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            played: Mutex::new(Vec::new()),
            notify: None,
            fail: true,
        })
    }

    fn notifying(sender: mpsc::UnboundedSender<Played>) -> Arc<Self> {
        Arc::new(Self {
            played: Mutex::new(Vec::new()),
            notify: Some(sender),
            fail: false,
        })
    }

    fn played(&self) -> Vec<Played> {
        self.played.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl AudioPlayer for RecordingPlayer {
    async fn play(&self, path: &Path) -> Result<(), VoiceError> {
        let played = Played {
            path: path.to_path_buf(),
            contents: tokio::fs::read(path).await?,
        };
        self.played.lock().unwrap().push(played.clone());
        if let Some(sender) = &self.notify {
            let _ = sender.send(played);
        }
        if self.fail {
            return Err(VoiceError::PlaybackFailed("no audio device".to_string()));
        }
        Ok(())
    }
}

fn scratch() -> (tempfile::TempDir, ScratchSpace) {
    let dir = tempfile::TempDir::new().unwrap();
    let scratch = ScratchSpace::new(dir.path().to_path_buf()).unwrap();
    (dir, scratch)
}

fn scratch_is_empty(scratch: &ScratchSpace) -> bool {
    std::fs::read_dir(scratch.directory()).unwrap().next().is_none()
}

#[tokio::test]
async fn given_working_primary_when_speaking_then_plays_primary_audio_and_removes_file() {
    let (_dir, scratch) = scratch();
    let primary = MockSynthesizer::new("primary", Behaviour::Speak(b"primary-mp3"));
    let fallback = MockSynthesizer::new("fallback", Behaviour::Speak(b"fallback-mp3"));
    let player = RecordingPlayer::new();
    let speaker = SynthesizingSpeaker::new(
        Some(primary.clone()),
        fallback.clone(),
        player.clone(),
        scratch.clone(),
    );

    speaker.speak_now("Rest and drink fluids.").await.unwrap();

    let played = player.played();
    assert_eq!(played.len(), 1);
    assert_eq!(played[0].contents, b"primary-mp3");
    assert_eq!(
        played[0].path.extension().and_then(|e| e.to_str()),
        Some("mp3")
    );
    assert!(played[0].path.starts_with(scratch.directory()));
    assert_eq!(fallback.calls.load(Ordering::SeqCst), 0);
    assert!(scratch_is_empty(&scratch));
}

#[tokio::test]
async fn given_failing_primary_when_speaking_then_falls_back() {
    let (_dir, scratch) = scratch();
    let primary = MockSynthesizer::new("primary", Behaviour::Fail);
    let fallback = MockSynthesizer::new("fallback", Behaviour::Speak(b"fallback-mp3"));
    let player = RecordingPlayer::new();
    let speaker = SynthesizingSpeaker::new(Some(primary.clone()), fallback.clone(), player.clone(), scratch);

    speaker.speak_now("Rest and drink fluids.").await.unwrap();

    assert_eq!(primary.calls.load(Ordering::SeqCst), 1);
    assert_eq!(fallback.calls.load(Ordering::SeqCst), 1);
    assert_eq!(player.played()[0].contents, b"fallback-mp3");
}

#[tokio::test]
async fn given_hanging_primary_when_timeout_elapses_then_falls_back() {
    let (_dir, scratch) = scratch();
    let primary = MockSynthesizer::new("primary", Behaviour::Hang);
    let fallback = MockSynthesizer::new("fallback", Behaviour::Speak(b"fallback-mp3"));
    let player = RecordingPlayer::new();
    let speaker = SynthesizingSpeaker::new(Some(primary), fallback, player.clone(), scratch)
        .with_synthesis_timeout(Duration::from_millis(50));

    speaker.speak_now("Rest and drink fluids.").await.unwrap();

    assert_eq!(player.played()[0].contents, b"fallback-mp3");
}

#[tokio::test]
async fn given_no_primary_when_speaking_then_uses_fallback_directly() {
    let (_dir, scratch) = scratch();
    let fallback = MockSynthesizer::new("fallback", Behaviour::Speak(b"fallback-mp3"));
    let player = RecordingPlayer::new();
    let speaker = SynthesizingSpeaker::new(None, fallback.clone(), player.clone(), scratch);

    speaker.speak_now("Rest.").await.unwrap();

    assert_eq!(fallback.calls.load(Ordering::SeqCst), 1);
    assert_eq!(player.played().len(), 1);
}

#[tokio::test]
async fn given_both_synthesizers_failing_when_speaking_then_returns_error_without_playing() {
    let (_dir, scratch) = scratch();
    let primary = MockSynthesizer::new("primary", Behaviour::Fail);
    let fallback = MockSynthesizer::new("fallback", Behaviour::Fail);
    let player = RecordingPlayer::new();
    let speaker = SynthesizingSpeaker::new(Some(primary), fallback, player.clone(), scratch.clone());

    let result = speaker.speak_now("Rest.").await;

    assert!(matches!(result, Err(VoiceError::SynthesisFailed(_))));
    assert!(player.played().is_empty());
    assert!(scratch_is_empty(&scratch));
}

#[tokio::test]
async fn given_playback_failure_when_speaking_then_file_is_still_removed() {
    let (_dir, scratch) = scratch();
    let fallback = MockSynthesizer::new("fallback", Behaviour::Speak(b"fallback-mp3"));
    let player = RecordingPlayer::failing();
    let speaker = SynthesizingSpeaker::new(None, fallback, player, scratch.clone());

    let result = speaker.speak_now("Rest.").await;

    assert!(matches!(result, Err(VoiceError::PlaybackFailed(_))));
    assert!(scratch_is_empty(&scratch));
}

#[tokio::test]
async fn given_speaker_trait_when_speaking_then_returns_immediately_and_plays_in_background() {
    let (_dir, scratch) = scratch();
    let (sender, mut receiver) = mpsc::unbounded_channel();
    let fallback = MockSynthesizer::new("fallback", Behaviour::Speak(b"fallback-mp3"));
    let speaker = SynthesizingSpeaker::new(
        None,
        fallback,
        RecordingPlayer::notifying(sender),
        scratch,
    );

    speaker.speak("Stay hydrated.");

    let played = tokio::time::timeout(Duration::from_secs(5), receiver.recv())
        .await
        .expect("background playback did not happen")
        .unwrap();
    assert_eq!(played.contents, b"fallback-mp3");
}

#[tokio::test]
async fn given_blank_text_when_speaking_then_nothing_is_synthesized() {
    let (_dir, scratch) = scratch();
    let fallback = MockSynthesizer::new("fallback", Behaviour::Speak(b"fallback-mp3"));
    let speaker = SynthesizingSpeaker::new(None, fallback.clone(), RecordingPlayer::new(), scratch);

    speaker.speak("   ");
    tokio::task::yield_now().await;

    assert_eq!(fallback.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn given_no_runtime_when_speaking_then_does_not_panic() {
    let (_dir, scratch) = scratch();
    let fallback = MockSynthesizer::new("fallback", Behaviour::Speak(b"fallback-mp3"));
    let speaker = SynthesizingSpeaker::new(None, fallback.clone(), RecordingPlayer::new(), scratch);

    speaker.speak("Rest.");

    assert_eq!(fallback.calls.load(Ordering::SeqCst), 0);
}

struct StallingPlayer {
    started: mpsc::UnboundedSender<PathBuf>,
}

#[async_trait::async_trait]
impl AudioPlayer for StallingPlayer {
    async fn play(&self, path: &Path) -> Result<(), VoiceError> {
        let _ = self.started.send(path.to_path_buf());
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(())
    }
}

#[test]
fn given_runtime_shutdown_during_playback_when_task_is_dropped_then_voice_file_is_removed() {
    let (_dir, scratch) = scratch();
    let (sender, mut receiver) = mpsc::unbounded_channel();
    let fallback = MockSynthesizer::new("fallback", Behaviour::Speak(b"fallback-mp3"));
    let player = Arc::new(StallingPlayer { started: sender });
    let speaker = SynthesizingSpeaker::new(None, fallback, player, scratch.clone());
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();

    let playing = runtime.block_on(async {
        speaker.speak("Drink plenty of fluids.");
        tokio::time::timeout(Duration::from_secs(5), receiver.recv())
            .await
            .expect("playback did not start")
            .unwrap()
    });
    assert!(playing.exists());

    drop(runtime);

    assert!(!playing.exists());
    assert!(scratch_is_empty(&scratch));
}
