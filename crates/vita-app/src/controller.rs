use std::sync::Arc;

use kanal::{AsyncReceiver, AsyncSender};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use vita_camera::{CaptureDevice, DeviceNodeCamera};
use vita_core::state::AppState;
use vita_types::AppEvent;

use crate::events::event_loop;
use crate::io::{input_loop, spawn_stdin_reader};
use crate::ui::ui_loop;

/// Centralized channel management
pub struct ChannelSet {
    pub app_to_ui: (AsyncSender<AppEvent>, AsyncReceiver<AppEvent>),
    pub ui_to_app: (AsyncSender<AppEvent>, AsyncReceiver<AppEvent>),
}

impl ChannelSet {
    pub fn new(ui_capacity: usize) -> Self {
        Self {
            app_to_ui: kanal::bounded_async(ui_capacity), // vitals ticks + AI replies
            ui_to_app: kanal::bounded_async(64),          // console commands
        }
    }
}

/// Application controller for task spawning and lifecycle
pub struct AppController {
    channels: ChannelSet,
    state: Arc<AppState>,
    device: Arc<dyn CaptureDevice>,
    cancel_token: CancellationToken,
}

impl AppController {
    pub async fn new(state: Arc<AppState>) -> Self {
        let (capacity, device_path) = {
            let config = state.config.read().await;
            (config.ui_channel_capacity, config.camera.device_path.clone())
        };

        tracing::info!("Using camera device {}", device_path);
        Self {
            channels: ChannelSet::new(capacity),
            state,
            device: Arc::new(DeviceNodeCamera::new(device_path)),
            cancel_token: CancellationToken::new(),
        }
    }

    pub fn spawn_tasks(&self) -> JoinSet<anyhow::Result<()>> {
        let mut tasks = JoinSet::new();

        // Event loop
        tasks.spawn(event_loop(
            self.state.clone(),
            self.device.clone(),
            self.channels.ui_to_app.1.clone(),
            self.channels.app_to_ui.0.clone(),
            self.cancel_token.child_token(),
        ));

        // Console renderer
        tasks.spawn(ui_loop(
            self.channels.app_to_ui.1.clone(),
            self.cancel_token.child_token(),
        ));

        // Console input
        tasks.spawn(input_loop(
            spawn_stdin_reader(),
            self.channels.ui_to_app.0.clone(),
            self.channels.app_to_ui.0.clone(),
            self.cancel_token.child_token(),
        ));

        tasks
    }

    pub fn shutdown(&self) {
        self.cancel_token.cancel();
    }
}
