use std::path::{Path, PathBuf};

use async_trait::async_trait;
use image::ImageFormat;
use image::codecs::jpeg::JpegEncoder;

use crate::application::ports::{ImageStager, ImageStagingError};
use crate::domain::InputMedia;

const JPEG_QUALITY: u8 = 90;

/// Re-encodes every supplied image, path or upload alike, to RGB JPEG.
pub struct JpegImageStager {
    max_dimension: u32,
}

impl JpegImageStager {
    pub const DEFAULT_MAX_DIMENSION: u32 = 2048;

    pub fn new(max_dimension: u32) -> Self {
        Self { max_dimension }
    }
}

impl Default for JpegImageStager {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_DIMENSION)
    }
}

#[async_trait]
impl ImageStager for JpegImageStager {
    #[tracing::instrument(skip(self, input), fields(destination = %destination.display()))]
    async fn stage(
        &self,
        input: &InputMedia,
        destination: &Path,
    ) -> Result<Option<PathBuf>, ImageStagingError> {
        if !input.is_present() {
            return Ok(None);
        }

        let data = input.read().await?;
        let max_dimension = self.max_dimension;

        let jpeg = tokio::task::spawn_blocking(move || reencode_as_jpeg(&data, max_dimension))
            .await
            .map_err(|e| ImageStagingError::ImageDecodeFailure(format!("task join error: {e}")))??;

        tokio::fs::write(destination, &jpeg).await?;

        tracing::debug!(bytes = jpeg.len(), "Image staged");
        Ok(Some(destination.to_path_buf()))
    }
}

fn reencode_as_jpeg(data: &[u8], max_dimension: u32) -> Result<Vec<u8>, ImageStagingError> {
    let format = image::guess_format(data)
        .map_err(|e| ImageStagingError::ImageDecodeFailure(format!("unknown format: {e}")))?;

    let mut decoded = image::load_from_memory_with_format(data, format)
        .map_err(|e| ImageStagingError::ImageDecodeFailure(format!("{format:?}: {e}")))?;

    if decoded.width() > max_dimension || decoded.height() > max_dimension {
        decoded = decoded.thumbnail(max_dimension, max_dimension);
    }

    // JPEG has no alpha channel.
    let rgb = decoded.to_rgb8();

    let mut jpeg: Vec<u8> = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut jpeg, JPEG_QUALITY);
    rgb.write_with_encoder(encoder)
        .map_err(|e| ImageStagingError::ImageDecodeFailure(format!("jpeg encode: {e}")))?;

    Ok(jpeg)
}

pub(crate) fn mime_for(data: &[u8]) -> &'static str {
    match image::guess_format(data) {
        Ok(ImageFormat::Png) => "image/png",
        Ok(ImageFormat::WebP) => "image/webp",
        Ok(ImageFormat::Gif) => "image/gif",
        _ => "image/jpeg",
    }
}
