use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::ImageFormat;

/// Upload limit for meal photos (4 MiB)
pub const MAX_IMAGE_BYTES: usize = 4 * 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("File size must be less than 4MB.")]
    TooLarge(usize),

    #[error("Unsupported image type. Use PNG, JPEG or WebP.")]
    UnsupportedFormat,

    #[error("Failed to read image: {0}")]
    Io(#[from] std::io::Error),
}

/// Base64 image ready to be sent inline to the model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    pub data_base64: String,
    pub mime_type: String,
    pub size: usize,
}

impl ImagePayload {
    /// Validate raw bytes (size, PNG/JPEG/WebP signature) and encode them
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ImageError> {
        if bytes.len() > MAX_IMAGE_BYTES {
            return Err(ImageError::TooLarge(bytes.len()));
        }

        let format = image::guess_format(bytes).map_err(|_| ImageError::UnsupportedFormat)?;
        let mime_type = match format {
            ImageFormat::Png | ImageFormat::Jpeg | ImageFormat::WebP => format.to_mime_type(),
            _ => return Err(ImageError::UnsupportedFormat),
        };

        Ok(Self {
            data_base64: STANDARD.encode(bytes),
            mime_type: mime_type.to_string(),
            size: bytes.len(),
        })
    }

    pub async fn load(path: &Path) -> Result<Self, ImageError> {
        let metadata = tokio::fs::metadata(path).await?;
        if metadata.len() > MAX_IMAGE_BYTES as u64 {
            return Err(ImageError::TooLarge(metadata.len() as usize));
        }

        let bytes = tokio::fs::read(path).await?;
        Self::from_bytes(&bytes)
    }
}
