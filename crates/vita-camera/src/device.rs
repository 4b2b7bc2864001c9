use std::fs::File;
use std::path::PathBuf;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::CameraError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FacingMode {
    #[default]
    User,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StreamConstraints {
    pub facing_mode: FacingMode,
}

impl StreamConstraints {
    pub fn user_facing() -> Self {
        Self {
            facing_mode: FacingMode::User,
        }
    }
}

/// One capture track of a live stream
pub trait MediaTrack: Send + Sync {
    fn label(&self) -> &str;

    /// Release the underlying device. Must be idempotent.
    fn stop(&mut self);

    fn is_live(&self) -> bool;
}

/// A live video stream made of one or more tracks
pub struct MediaStream {
    id: Uuid,
    tracks: Vec<Box<dyn MediaTrack>>,
}

impl MediaStream {
    pub fn new(tracks: Vec<Box<dyn MediaTrack>>) -> Self {
        Self {
            id: Uuid::new_v4(),
            tracks,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn tracks(&self) -> &[Box<dyn MediaTrack>] {
        &self.tracks
    }

    pub fn is_live(&self) -> bool {
        self.tracks.iter().any(|t| t.is_live())
    }

    pub fn stop_all(&mut self) {
        for track in &mut self.tracks {
            track.stop();
        }
    }
}

/// Source of video streams
#[async_trait]
pub trait CaptureDevice: Send + Sync {
    async fn request_video_stream(
        &self,
        constraints: &StreamConstraints,
    ) -> Result<MediaStream, CameraError>;
}

/// Capture device backed by a video device node such as `/dev/video0`.
///
/// Holding the node open is what keeps the device busy, so the open file
/// handle is the track.
pub struct DeviceNodeCamera {
    path: PathBuf,
}

impl DeviceNodeCamera {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CaptureDevice for DeviceNodeCamera {
    async fn request_video_stream(
        &self,
        constraints: &StreamConstraints,
    ) -> Result<MediaStream, CameraError> {
        tracing::debug!(
            "Opening {} (facing: {:?})",
            self.path.display(),
            constraints.facing_mode
        );

        let file = tokio::fs::OpenOptions::new()
            .read(true)
            .write(true)
            .open(&self.path)
            .await
            .map_err(|e| {
                tracing::error!("Error accessing camera {}: {}", self.path.display(), e);
                CameraError::from(e)
            })?;

        let track = DeviceTrack {
            label: self.path.display().to_string(),
            file: Some(file.into_std().await),
        };

        Ok(MediaStream::new(vec![Box::new(track)]))
    }
}

struct DeviceTrack {
    label: String,
    file: Option<File>,
}

impl MediaTrack for DeviceTrack {
    fn label(&self) -> &str {
        &self.label
    }

    fn stop(&mut self) {
        if self.file.take().is_some() {
            tracing::debug!("Released {}", self.label);
        }
    }

    fn is_live(&self) -> bool {
        self.file.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_device_is_unsupported() {
        let camera = DeviceNodeCamera::new("/nonexistent/vita/video9");
        let result = camera
            .request_video_stream(&StreamConstraints::user_facing())
            .await;
        assert_eq!(result.err(), Some(CameraError::Unsupported));
    }

    #[test]
    fn test_stream_stop_all_is_idempotent() {
        let track = DeviceTrack {
            label: "test".to_string(),
            file: None,
        };
        let mut stream = MediaStream::new(vec![Box::new(track)]);
        stream.stop_all();
        stream.stop_all();
        assert!(!stream.is_live());
    }
}
