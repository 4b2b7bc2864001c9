use std::sync::Arc;

use vita_types::CameraState;

use crate::device::{CaptureDevice, MediaStream, StreamConstraints};
use crate::error::CameraError;

/// Something that renders a live stream
pub trait VideoSurface: Send + Sync {
    fn attach(&mut self, stream: &MediaStream);
    fn detach(&mut self);
}

/// Surface that renders nothing
pub struct NullSurface;

impl VideoSurface for NullSurface {
    fn attach(&mut self, _stream: &MediaStream) {}
    fn detach(&mut self) {}
}

/// Owns the capture device handle for one view.
///
/// The stream is released on `stop`, `turn_off` and when the session is
/// dropped, so every teardown path frees the hardware.
pub struct CameraSession {
    device: Arc<dyn CaptureDevice>,
    surface: Box<dyn VideoSurface>,
    stream: Option<MediaStream>,
    state: CameraState,
}

impl CameraSession {
    pub fn new(device: Arc<dyn CaptureDevice>, surface: Box<dyn VideoSurface>) -> Self {
        Self {
            device,
            surface,
            stream: None,
            state: CameraState::default(),
        }
    }

    pub fn state(&self) -> &CameraState {
        &self.state
    }

    pub fn is_on(&self) -> bool {
        self.state.is_on
    }

    pub fn is_streaming(&self) -> bool {
        self.stream.as_ref().is_some_and(MediaStream::is_live)
    }

    /// Acquire a user-facing camera and bind it to the surface
    pub async fn start(&mut self) -> Result<(), CameraError> {
        // Never hold two streams
        self.stop();

        self.state.is_on = true;
        self.state.error_message = None;

        match self
            .device
            .request_video_stream(&StreamConstraints::user_facing())
            .await
        {
            Ok(stream) => {
                let labels: Vec<&str> = stream.tracks().iter().map(|t| t.label()).collect();
                tracing::info!("Camera stream {} started ({})", stream.id(), labels.join(", "));
                self.surface.attach(&stream);
                self.stream = Some(stream);
                Ok(())
            }
            Err(e) => {
                tracing::error!("Error accessing camera: {}", e);
                self.state.error_message = Some(e.user_message().to_string());
                Err(e)
            }
        }
    }

    /// Stop all tracks and unbind the surface. Safe to call when stopped.
    pub fn stop(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.stop_all();
            self.surface.detach();
            tracing::info!("Camera stream {} stopped", stream.id());
        }
    }

    /// User toggled the camera off
    pub fn turn_off(&mut self) {
        self.stop();
        self.state.is_on = false;
        self.state.error_message = None;
    }
}

impl Drop for CameraSession {
    fn drop(&mut self) {
        self.stop();
    }
}
