use std::path::PathBuf;

use bytes::Bytes;

use medivox::domain::InputMedia;

#[test]
fn given_empty_bytes_when_building_media_then_absent() {
    let media = InputMedia::from_bytes(Bytes::new(), Some("empty.wav".to_string()));

    assert_eq!(media, InputMedia::None);
    assert!(!media.is_present());
}

#[test]
fn given_bytes_with_filename_when_reading_extension_then_lowercased() {
    let media = InputMedia::from_bytes(&b"data"[..], Some("Recording.WAV".to_string()));

    assert!(media.is_present());
    assert_eq!(media.extension().as_deref(), Some("wav"));
}

#[test]
fn given_bytes_without_filename_when_reading_extension_then_none() {
    let media = InputMedia::from_bytes(&b"data"[..], None);

    assert_eq!(media.extension(), None);
}

#[test]
fn given_path_when_reading_extension_then_uses_path() {
    let media = InputMedia::Path(PathBuf::from("/tmp/photo.PNG"));

    assert_eq!(media.extension().as_deref(), Some("png"));
}

#[tokio::test]
async fn given_path_media_when_reading_then_returns_file_contents() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("clip.mp3");
    std::fs::write(&path, b"mp3 bytes").unwrap();

    let data = InputMedia::Path(path).read().await.unwrap();

    assert_eq!(&data[..], b"mp3 bytes");
}

#[tokio::test]
async fn given_missing_path_when_reading_then_io_error() {
    let media = InputMedia::Path(PathBuf::from("/definitely/not/here.wav"));

    assert!(media.read().await.is_err());
}

#[tokio::test]
async fn given_absent_media_when_reading_then_empty() {
    assert!(InputMedia::None.read().await.unwrap().is_empty());
}
