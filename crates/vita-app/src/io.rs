use std::io::BufRead;
use std::path::PathBuf;

use kanal::{AsyncReceiver, AsyncSender};
use tokio_util::sync::CancellationToken;
use vita_types::{AppEvent, ToolSelection, UiEvent, View};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("Unknown command: {0}")]
    Unknown(String),

    #[error("Usage: {0}")]
    MissingArgument(&'static str),
}

/// Parse one console line. Plain text goes to the active AI tool; empty
/// lines produce nothing.
pub fn parse_line(line: &str) -> Result<Option<UiEvent>, CommandError> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.is_empty() {
        return Ok(None);
    }

    let Some(command) = line.strip_prefix('/') else {
        return Ok(Some(UiEvent::TextInput(line.to_string())));
    };

    let (name, arg) = match command.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (command, ""),
    };

    let event = match name {
        "ar" => UiEvent::SelectView(View::Ar),
        "ai" => UiEvent::SelectView(View::Ai),
        "chat" => UiEvent::SelectTool(ToolSelection::Chat),
        "image" => UiEvent::SelectTool(ToolSelection::Image),
        "quick" => UiEvent::SelectTool(ToolSelection::Quick),
        "camera" => UiEvent::ToggleCamera,
        "analyze" => UiEvent::AnalyzeImage,
        "quit" | "exit" => UiEvent::Close,
        "load" if arg.is_empty() => return Err(CommandError::MissingArgument("/load <path>")),
        "load" => UiEvent::LoadImage(PathBuf::from(arg)),
        "prompt" if arg.is_empty() => return Err(CommandError::MissingArgument("/prompt <text>")),
        "prompt" => UiEvent::SetImagePrompt(arg.to_string()),
        other => return Err(CommandError::Unknown(format!("/{other}"))),
    };

    Ok(Some(event))
}

/// Read stdin on a plain thread. The thread is detached: a blocking read
/// must not hold up runtime shutdown.
pub fn spawn_stdin_reader() -> AsyncReceiver<String> {
    let (tx, rx) = kanal::bounded::<String>(16);

    let spawned = std::thread::Builder::new()
        .name("stdin-reader".to_string())
        .spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                match line {
                    Ok(line) => {
                        if tx.send(line).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::error!("Failed to read stdin: {}", e);
                        break;
                    }
                }
            }
            tracing::debug!("stdin closed");
        });

    if let Err(e) = spawned {
        tracing::error!("Failed to spawn stdin reader: {}", e);
    }

    rx.to_async()
}

pub async fn input_loop(
    lines: AsyncReceiver<String>,
    ui_to_app_tx: AsyncSender<AppEvent>,
    app_to_ui_tx: AsyncSender<AppEvent>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    loop {
        let line = tokio::select! {
            _ = cancel.cancelled() => break,
            line = lines.recv() => match line {
                Ok(line) => line,
                // EOF on stdin: keep the app running until Ctrl+C
                Err(_) => {
                    cancel.cancelled().await;
                    break;
                }
            },
        };

        match parse_line(&line) {
            Ok(Some(event)) => {
                tracing::debug!("Console event: {:?}", event);
                ui_to_app_tx.send(AppEvent::UiEvent(event)).await?;
            }
            Ok(None) => {}
            Err(e) => {
                let _ = app_to_ui_tx.send(AppEvent::Notice(e.to_string())).await;
            }
        }
    }

    tracing::info!("Console input stopping");
    Ok(())
}
