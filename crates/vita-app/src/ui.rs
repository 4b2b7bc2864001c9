use kanal::AsyncReceiver;
use tokio::io::AsyncWriteExt;
use tokio_util::sync::CancellationToken;
use vita_types::{AppEvent, Role, ScanStatus};

const HELP: &str = "Commands: /ar /ai /chat /image /quick /camera /load <path> /prompt <text> /analyze /quit";

/// Console line for an outbound event, `None` for events with nothing to show
pub fn render(event: &AppEvent) -> Option<String> {
    let line = match event {
        AppEvent::BackendReady => format!("Vita ready. {HELP}"),
        AppEvent::ViewChanged(view) => format!("== {} ==", view.label()),
        AppEvent::ToolChanged(tool) => format!("-- {} --", tool.label()),
        AppEvent::CameraStatus(state) => match (&state.error_message, state.is_on) {
            (Some(message), _) => format!("[camera] {message}"),
            (None, true) => "[camera] on".to_string(),
            (None, false) => "[camera] off".to_string(),
        },
        AppEvent::CameraPreview {
            stream_id: Some(id),
        } => format!("[camera] streaming {id}"),
        AppEvent::CameraPreview { stream_id: None } => return None,
        AppEvent::ScanStatusChanged { status, error } => match status {
            ScanStatus::Scanning => "[scan] Scanning...".to_string(),
            ScanStatus::Detected => "[scan] Subject detected".to_string(),
            ScanStatus::Error => {
                format!("[scan] Error: {}", error.as_deref().unwrap_or("unknown"))
            }
        },
        AppEvent::VitalsUpdate(reading) => format!("[vitals] {reading} | Status: NORMAL"),
        AppEvent::ChatMessage(message) => match message.role {
            Role::User => format!("you> {}", message.text),
            Role::Model => format!("ai> {}", message.text),
        },
        AppEvent::ChatPending(true) => "ai> ...".to_string(),
        AppEvent::ChatPending(false) => return None,
        AppEvent::ImageLoaded { mime_type, bytes } => {
            format!("[image] loaded {mime_type}, {:.1} KB", *bytes as f64 / 1024.0)
        }
        AppEvent::ImageAnalysis(text) => format!("[analysis] {text}"),
        AppEvent::QuickResponse(text) => format!("[quick] {text}"),
        AppEvent::PanelBusy { tool, busy: true } => format!("[{}] working...", tool.label()),
        AppEvent::PanelBusy { busy: false, .. } => return None,
        AppEvent::Notice(text) => format!("! {text}"),
        AppEvent::UiEvent(_) => return None,
    };

    Some(line)
}

pub async fn ui_loop(
    app_to_ui_rx: AsyncReceiver<AppEvent>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let mut stdout = tokio::io::stdout();

    loop {
        let event = tokio::select! {
            _ = cancel.cancelled() => break,
            event = app_to_ui_rx.recv() => event?,
        };

        if let Some(line) = render(&event) {
            stdout.write_all(line.as_bytes()).await?;
            stdout.write_all(b"\n").await?;
            stdout.flush().await?;
        }
    }

    tracing::info!("Renderer stopping");
    Ok(())
}
