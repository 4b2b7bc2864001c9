use std::sync::Arc;

use kanal::AsyncSender;
use vita_camera::{CameraSession, CaptureDevice, MediaStream, VideoSurface};
use vita_config::vitals::VitalsConfig;
use vita_core::vitals::{DeltaSource, VitalsMonitor, VitalsSnapshot};
use vita_types::AppEvent;

/// Forwards stream bind/unbind to the console renderer
pub struct PreviewSurface {
    tx: AsyncSender<AppEvent>,
}

impl PreviewSurface {
    pub fn new(tx: AsyncSender<AppEvent>) -> Self {
        Self { tx }
    }

    fn notify(&self, stream_id: Option<String>) {
        // Preview frames are best effort, never block the camera
        if let Err(e) = self.tx.try_send(AppEvent::CameraPreview { stream_id }) {
            tracing::debug!("Preview event dropped: {}", e);
        }
    }
}

impl VideoSurface for PreviewSurface {
    fn attach(&mut self, stream: &MediaStream) {
        self.notify(Some(stream.id().to_string()));
    }

    fn detach(&mut self) {
        self.notify(None);
    }
}

/// Camera feed plus the vitals overlay.
///
/// Dropping the view releases the camera stream and cancels the vitals
/// timers.
pub struct ArView {
    camera: CameraSession,
    monitor: VitalsMonitor,
    tx: AsyncSender<AppEvent>,
}

impl ArView {
    pub async fn mount(
        device: Arc<dyn CaptureDevice>,
        vitals: &VitalsConfig,
        source: Arc<dyn DeltaSource>,
        start_on: bool,
        tx: AsyncSender<AppEvent>,
    ) -> Self {
        let surface = Box::new(PreviewSurface::new(tx.clone()));
        let mut view = Self {
            camera: CameraSession::new(device, surface),
            monitor: VitalsMonitor::new(vitals, source).with_events(tx.clone()),
            tx,
        };

        if start_on {
            view.camera_on().await;
        } else {
            view.publish_camera().await;
        }
        view
    }

    pub fn is_camera_on(&self) -> bool {
        self.camera.is_on()
    }

    pub fn is_streaming(&self) -> bool {
        self.camera.is_streaming()
    }

    pub fn has_active_timers(&self) -> bool {
        self.monitor.has_active_timers()
    }

    pub async fn vitals(&self) -> VitalsSnapshot {
        self.monitor.snapshot().await
    }

    pub async fn toggle_camera(&mut self) {
        if self.camera.is_on() {
            self.camera_off().await;
        } else {
            self.camera_on().await;
        }
    }

    async fn camera_on(&mut self) {
        self.monitor.camera_on().await;
        if let Err(e) = self.camera.start().await {
            self.monitor.camera_failed(e.user_message()).await;
        }
        self.publish_camera().await;
    }

    async fn camera_off(&mut self) {
        self.camera.turn_off();
        self.monitor.camera_off().await;
        self.publish_camera().await;
    }

    async fn publish_camera(&self) {
        let state = self.camera.state().clone();
        if let Err(e) = self.tx.send(AppEvent::CameraStatus(state)).await {
            tracing::debug!("Camera status dropped: {}", e);
        }
    }
}
