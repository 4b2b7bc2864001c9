use std::sync::Arc;
use std::time::Duration;

use kanal::AsyncSender;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;
use vita_config::vitals::VitalsConfig;
use vita_types::{AppEvent, ScanStatus, VitalsReading};

use super::delta::DeltaSource;
use super::machine::VitalsMachine;

#[derive(Debug, Clone, PartialEq)]
pub struct VitalsSnapshot {
    pub status: ScanStatus,
    pub readings: VitalsReading,
    pub error_message: Option<String>,
}

struct PhaseTask {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

/// Drives a [`VitalsMachine`] with real timers.
///
/// Each camera session gets one phase task: dwell, then detect, then tick
/// until cancelled. `cancel_phase` is the only way a phase ends early and
/// every exit path (off, failure, restart, drop) goes through it.
pub struct VitalsMonitor {
    machine: Arc<Mutex<VitalsMachine>>,
    source: Arc<dyn DeltaSource>,
    scan_dwell: Duration,
    tick_interval: Duration,
    events: Option<AsyncSender<AppEvent>>,
    phase: Option<PhaseTask>,
}

impl VitalsMonitor {
    pub fn new(config: &VitalsConfig, source: Arc<dyn DeltaSource>) -> Self {
        Self {
            machine: Arc::new(Mutex::new(VitalsMachine::new())),
            source,
            scan_dwell: config.scan_dwell(),
            tick_interval: config.tick_interval(),
            events: None,
            phase: None,
        }
    }

    /// Publish status changes and readings on `tx`
    pub fn with_events(mut self, tx: AsyncSender<AppEvent>) -> Self {
        self.events = Some(tx);
        self
    }

    pub async fn snapshot(&self) -> VitalsSnapshot {
        let machine = self.machine.lock().await;
        VitalsSnapshot {
            status: machine.status(),
            readings: machine.readings(),
            error_message: machine.error_message().map(str::to_string),
        }
    }

    /// Whether a dwell or tick timer is still scheduled
    pub fn has_active_timers(&self) -> bool {
        self.phase
            .as_ref()
            .is_some_and(|phase| !phase.handle.is_finished())
    }

    /// Start a fresh session: reset to scanning and schedule detection
    pub async fn camera_on(&mut self) {
        self.cancel_phase();
        self.machine.lock().await.camera_on();
        tracing::debug!("Vitals scan started");
        publish(&self.events, status_event(ScanStatus::Scanning, None)).await;

        let cancel = CancellationToken::new();
        let handle = tokio::spawn(run_phase(
            self.machine.clone(),
            self.source.clone(),
            self.scan_dwell,
            self.tick_interval,
            cancel.clone(),
            self.events.clone(),
        ));
        self.phase = Some(PhaseTask { cancel, handle });
    }

    pub async fn camera_off(&mut self) {
        self.cancel_phase();
        self.machine.lock().await.camera_off();
        tracing::debug!("Vitals timers cleared");
    }

    pub async fn camera_failed(&mut self, message: impl Into<String>) {
        self.cancel_phase();
        let message = message.into();
        tracing::warn!("Vitals scan failed: {}", message);
        self.machine.lock().await.camera_failed(message.clone());
        publish(&self.events, status_event(ScanStatus::Error, Some(message))).await;
    }

    pub fn shutdown(&mut self) {
        self.cancel_phase();
    }

    fn cancel_phase(&mut self) {
        if let Some(phase) = self.phase.take() {
            phase.cancel.cancel();
            phase.handle.abort();
        }
    }
}

impl Drop for VitalsMonitor {
    fn drop(&mut self) {
        self.cancel_phase();
    }
}

async fn run_phase(
    machine: Arc<Mutex<VitalsMachine>>,
    source: Arc<dyn DeltaSource>,
    scan_dwell: Duration,
    tick_interval: Duration,
    cancel: CancellationToken,
    events: Option<AsyncSender<AppEvent>>,
) {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => return,
        _ = time::sleep(scan_dwell) => {}
    }

    if !machine.lock().await.scan_elapsed() {
        return;
    }
    tracing::info!("Subject detected, streaming vitals");
    publish(&events, status_event(ScanStatus::Detected, None)).await;

    let mut interval = time::interval_at(Instant::now() + tick_interval, tick_interval);
    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = interval.tick() => {}
        }

        let reading = machine.lock().await.tick(source.as_ref());
        match reading {
            Some(reading) => publish(&events, AppEvent::VitalsUpdate(reading)).await,
            None => break,
        }
    }
}

fn status_event(status: ScanStatus, error: Option<String>) -> AppEvent {
    AppEvent::ScanStatusChanged { status, error }
}

async fn publish(events: &Option<AsyncSender<AppEvent>>, event: AppEvent) {
    if let Some(tx) = events {
        if let Err(e) = tx.send(event).await {
            tracing::debug!("Vitals event dropped: {}", e);
        }
    }
}
