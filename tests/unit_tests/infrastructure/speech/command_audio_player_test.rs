use medivox::application::ports::{AudioPlayer, VoiceError};
use medivox::infrastructure::speech::CommandAudioPlayer;

#[tokio::test]
async fn given_successful_command_when_playing_then_receives_path_as_last_argument() {
    let dir = tempfile::TempDir::new().unwrap();
    let audio = dir.path().join("answer.mp3");
    std::fs::write(&audio, b"mp3").unwrap();
    let player = CommandAudioPlayer::new(
        "sh",
        vec!["-c".to_string(), "test -f \"$0\"".to_string()],
    );

    let result = player.play(&audio).await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn given_failing_command_when_playing_then_playback_failed() {
    let dir = tempfile::TempDir::new().unwrap();
    let player = CommandAudioPlayer::new(
        "sh",
        vec!["-c".to_string(), "test -f \"$0\"".to_string()],
    );

    let result = player.play(&dir.path().join("missing.mp3")).await;

    match result {
        Err(VoiceError::PlaybackFailed(message)) => assert!(message.contains("exited with")),
        other => panic!("expected PlaybackFailed, got {:?}", other),
    }
}

#[tokio::test]
async fn given_unknown_program_when_playing_then_playback_failed() {
    let player = CommandAudioPlayer::new("medivox-no-such-player", Vec::new());

    let result = player.play(std::path::Path::new("answer.mp3")).await;

    match result {
        Err(VoiceError::PlaybackFailed(message)) => {
            assert!(message.starts_with("medivox-no-such-player"))
        }
        other => panic!("expected PlaybackFailed, got {:?}", other),
    }
}
