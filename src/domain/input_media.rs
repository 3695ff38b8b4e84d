use std::path::{Path, PathBuf};

use bytes::Bytes;

/// Media supplied with a consultation, resolved once at the request boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum InputMedia {
    #[default]
    None,
    Path(PathBuf),
    Bytes {
        data: Bytes,
        filename: Option<String>,
    },
}

impl InputMedia {
    pub fn from_bytes(data: impl Into<Bytes>, filename: Option<String>) -> Self {
        let data = data.into();
        if data.is_empty() {
            return Self::None;
        }
        Self::Bytes { data, filename }
    }

    pub fn is_present(&self) -> bool {
        !matches!(self, Self::None)
    }

    /// File extension of the underlying path or filename, lowercased.
    pub fn extension(&self) -> Option<String> {
        let name = match self {
            Self::None => return None,
            Self::Path(path) => path.as_path(),
            Self::Bytes { filename, .. } => Path::new(filename.as_deref()?),
        };
        name.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
    }

    pub async fn read(&self) -> std::io::Result<Bytes> {
        match self {
            Self::None => Ok(Bytes::new()),
            Self::Path(path) => tokio::fs::read(path).await.map(Bytes::from),
            Self::Bytes { data, .. } => Ok(data.clone()),
        }
    }
}
