use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use kanal::{AsyncReceiver, AsyncSender};
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use vita_ai::AiOrchestrator;
use vita_ai::testing::ScriptedBackend;
use vita_camera::{CameraError, CaptureDevice, MediaStream, MediaTrack, StreamConstraints};
use vita_config::Config;
use vita_core::state::AppState;
use vita_core::vitals::DeltaSource;
use vita_types::{AppEvent, UiEvent};

use crate::events::run_event_loop;
use crate::views::Views;

mod event_loop_tests;

pub(crate) struct FakeTrack {
    live: Arc<AtomicBool>,
}

impl MediaTrack for FakeTrack {
    fn label(&self) -> &str {
        "fake camera"
    }

    fn stop(&mut self) {
        self.live.store(false, Ordering::SeqCst);
    }

    fn is_live(&self) -> bool {
        self.live.load(Ordering::SeqCst)
    }
}

/// Hands out fake tracks; scripted errors are returned first
pub(crate) struct FakeDevice {
    errors: Mutex<VecDeque<CameraError>>,
    tracks: Mutex<Vec<Arc<AtomicBool>>>,
}

impl FakeDevice {
    pub fn working() -> Arc<Self> {
        Self::failing(Vec::<CameraError>::new())
    }

    pub fn failing(errors: impl IntoIterator<Item = CameraError>) -> Arc<Self> {
        Arc::new(Self {
            errors: Mutex::new(errors.into_iter().collect()),
            tracks: Mutex::new(Vec::new()),
        })
    }

    pub fn live_tracks(&self) -> usize {
        self.tracks
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.load(Ordering::SeqCst))
            .count()
    }

    pub fn opened(&self) -> usize {
        self.tracks.lock().unwrap().len()
    }
}

#[async_trait]
impl CaptureDevice for FakeDevice {
    async fn request_video_stream(
        &self,
        _constraints: &StreamConstraints,
    ) -> Result<MediaStream, CameraError> {
        if let Some(e) = self.errors.lock().unwrap().pop_front() {
            return Err(e);
        }

        let live = Arc::new(AtomicBool::new(true));
        self.tracks.lock().unwrap().push(live.clone());
        Ok(MediaStream::new(vec![Box::new(FakeTrack { live })]))
    }
}

/// Always the top of the range
pub(crate) struct Upward;

impl DeltaSource for Upward {
    fn next_delta(&self, _min: f64, max: f64, _decimals: u32) -> f64 {
        max
    }
}

pub(crate) fn test_config(camera_on: bool) -> Config {
    Config::from_lookup(move |key: &str| match key {
        "GEMINI_API_KEY" => Some("test-key".to_string()),
        "CAMERA_START_ON" if !camera_on => Some("off".to_string()),
        _ => None,
    })
    .unwrap()
}

/// Event loop wired to fakes, driven through its channels
pub(crate) struct Harness {
    pub ui_tx: AsyncSender<AppEvent>,
    pub app_rx: AsyncReceiver<AppEvent>,
    pub cancel: CancellationToken,
    pub task: JoinHandle<anyhow::Result<()>>,
}

impl Harness {
    pub async fn start(
        device: Arc<FakeDevice>,
        backend: Arc<ScriptedBackend>,
        camera_on: bool,
    ) -> Self {
        let config = test_config(camera_on);
        let ai = AiOrchestrator::new(backend, "pro", "lite");

        let (ui_tx, ui_rx) = kanal::bounded_async(16);
        let (app_tx, app_rx) = kanal::bounded_async(256);
        let cancel = CancellationToken::new();

        let views = Views::with_source(device, Arc::new(Upward), &config, app_tx.clone()).await;
        let state = Arc::new(AppState::with_orchestrator(config, ai));
        let task = tokio::spawn(run_event_loop(state, views, ui_rx, app_tx, cancel.clone()));

        Self {
            ui_tx,
            app_rx,
            cancel,
            task,
        }
    }

    pub async fn send(&self, event: UiEvent) {
        self.ui_tx.send(AppEvent::UiEvent(event)).await.unwrap();
    }

    pub async fn next(&self) -> AppEvent {
        match timeout(Duration::from_secs(10), self.app_rx.recv()).await {
            Ok(Ok(event)) => event,
            Ok(Err(e)) => panic!("Channel error: {}", e),
            Err(_) => panic!("Timeout - event never arrived!"),
        }
    }

    /// Skip events until one matches
    pub async fn wait_for(&self, matches: impl Fn(&AppEvent) -> bool) -> AppEvent {
        loop {
            let event = self.next().await;
            if matches(&event) {
                return event;
            }
        }
    }

    /// Everything already queued, without waiting
    pub fn drain(&self) -> Vec<AppEvent> {
        let mut events = Vec::new();
        while let Ok(Some(event)) = self.app_rx.try_recv() {
            events.push(event);
        }
        events
    }
}
