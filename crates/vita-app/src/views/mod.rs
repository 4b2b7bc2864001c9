use std::sync::Arc;

use kanal::AsyncSender;
use vita_camera::CaptureDevice;
use vita_config::Config;
use vita_config::vitals::VitalsConfig;
use vita_core::router::ViewRouter;
use vita_core::vitals::{DeltaSource, RandomDelta};
use vita_types::{AppEvent, ToolSelection, View};

pub mod ai_tools;
pub mod ar;

pub use ai_tools::{AiTools, ToolPanel};
pub use ar::ArView;

/// The mounted view. Exactly one of the two exists at a time.
pub enum Mounted {
    Ar(ArView),
    Ai(AiTools),
}

/// Router plus the view it currently shows
pub struct Views {
    router: ViewRouter,
    mounted: Mounted,
    device: Arc<dyn CaptureDevice>,
    source: Arc<dyn DeltaSource>,
    vitals: VitalsConfig,
    start_on: bool,
    tx: AsyncSender<AppEvent>,
}

impl Views {
    pub async fn mount(
        device: Arc<dyn CaptureDevice>,
        config: &Config,
        tx: AsyncSender<AppEvent>,
    ) -> Self {
        Self::with_source(device, Arc::new(RandomDelta), config, tx).await
    }

    pub async fn with_source(
        device: Arc<dyn CaptureDevice>,
        source: Arc<dyn DeltaSource>,
        config: &Config,
        tx: AsyncSender<AppEvent>,
    ) -> Self {
        let router = ViewRouter::new();
        let ar = ArView::mount(
            device.clone(),
            &config.vitals,
            source.clone(),
            config.camera.start_on,
            tx.clone(),
        )
        .await;

        Self {
            router,
            mounted: Mounted::Ar(ar),
            device,
            source,
            vitals: config.vitals.clone(),
            start_on: config.camera.start_on,
            tx,
        }
    }

    pub fn view(&self) -> View {
        self.router.view()
    }

    pub fn mounted(&self) -> &Mounted {
        &self.mounted
    }

    pub fn ar_mut(&mut self) -> Option<&mut ArView> {
        match &mut self.mounted {
            Mounted::Ar(view) => Some(view),
            Mounted::Ai(_) => None,
        }
    }

    pub fn ai_mut(&mut self) -> Option<&mut AiTools> {
        match &mut self.mounted {
            Mounted::Ai(view) => Some(view),
            Mounted::Ar(_) => None,
        }
    }

    /// Switch top-level view. Returns false if it was already shown.
    pub async fn select_view(&mut self, view: View) -> bool {
        let Some(previous) = self.router.select_view(view) else {
            return false;
        };
        tracing::info!("View {:?} -> {:?}", previous, view);
        self.publish(AppEvent::ViewChanged(view)).await;

        self.mounted = match view {
            View::Ai => Mounted::Ai(AiTools::mount()),
            View::Ar => Mounted::Ar(
                ArView::mount(
                    self.device.clone(),
                    &self.vitals,
                    self.source.clone(),
                    self.start_on,
                    self.tx.clone(),
                )
                .await,
            ),
        };
        true
    }

    /// Switch tool inside the AI view. Returns false if ignored.
    pub async fn select_tool(&mut self, tool: ToolSelection) -> bool {
        if self.router.select_tool(tool).is_none() {
            return false;
        }
        if let Mounted::Ai(ai) = &mut self.mounted {
            ai.select(tool);
        }
        self.publish(AppEvent::ToolChanged(tool)).await;
        true
    }

    async fn publish(&self, event: AppEvent) {
        if let Err(e) = self.tx.send(event).await {
            tracing::debug!("View event dropped: {}", e);
        }
    }
}
