use std::path::Path;
use std::sync::Arc;

use kanal::AsyncSender;
use tokio::sync::Mutex;
use vita_core::SubmitRejection;
use vita_core::panels::ImagePanel;
use vita_core::state::AppState;
use vita_types::{AppEvent, ToolSelection};

use crate::events::notice;
use crate::views::{ToolPanel, Views};

const OPEN_IMAGE_TOOL: &str = "Switch to the meal analyzer with /image first.";

/// The mounted image panel, if the meal analyzer is open
fn image_panel(views: &mut Views) -> Option<Arc<Mutex<ImagePanel>>> {
    match views.ai_mut()?.panel() {
        ToolPanel::Image(panel) => Some(panel.clone()),
        _ => None,
    }
}

pub async fn handle_image_load(
    views: &mut Views,
    path: &Path,
    app_to_ui_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let Some(panel) = image_panel(views) else {
        notice(app_to_ui_tx, OPEN_IMAGE_TOOL).await;
        return Ok(());
    };

    let mut panel = panel.lock().await;
    match panel.load(path).await {
        Ok(image) => {
            tracing::info!("Loaded {} ({} bytes)", path.display(), image.size);
            app_to_ui_tx
                .send(AppEvent::ImageLoaded {
                    mime_type: image.mime_type.clone(),
                    bytes: image.size,
                })
                .await?;
        }
        Err(e) => {
            tracing::warn!("Rejected image {}: {}", path.display(), e);
            notice(app_to_ui_tx, &e.to_string()).await;
        }
    }

    Ok(())
}

pub async fn handle_image_prompt(
    views: &mut Views,
    prompt: String,
    app_to_ui_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let Some(panel) = image_panel(views) else {
        notice(app_to_ui_tx, OPEN_IMAGE_TOOL).await;
        return Ok(());
    };

    panel.lock().await.set_prompt(prompt.trim());
    notice(app_to_ui_tx, "Prompt updated.").await;
    Ok(())
}

pub async fn handle_image_analysis(
    state: &Arc<AppState>,
    views: &mut Views,
    app_to_ui_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let Some(panel) = image_panel(views) else {
        notice(app_to_ui_tx, OPEN_IMAGE_TOOL).await;
        return Ok(());
    };
    let Some(mounted) = views.ai_mut().map(|ai| ai.panel_token()) else {
        return Ok(());
    };

    let begun = panel.lock().await.begin_analysis();
    let request = match begun {
        Ok(request) => request,
        Err(rejection) => {
            let text = match rejection {
                SubmitRejection::MissingImage => "Load an image first with /load <path>.",
                SubmitRejection::EmptyInput => "Please enter a prompt with /prompt <text>.",
                SubmitRejection::RequestPending => "Please wait for the current analysis to finish.",
            };
            notice(app_to_ui_tx, text).await;
            return Ok(());
        }
    };

    app_to_ui_tx
        .send(AppEvent::PanelBusy {
            tool: ToolSelection::Image,
            busy: true,
        })
        .await?;

    let orchestrator = state.ai.clone();
    let tx = app_to_ui_tx.clone();
    tokio::spawn(async move {
        let reply = request.run(&orchestrator).await;
        let text = panel.lock().await.finish_analysis(reply).to_string();

        if mounted.is_cancelled() {
            tracing::debug!("Analysis arrived after the panel closed");
            return;
        }
        let _ = tx
            .send(AppEvent::PanelBusy {
                tool: ToolSelection::Image,
                busy: false,
            })
            .await;
        let _ = tx.send(AppEvent::ImageAnalysis(text)).await;
    });

    Ok(())
}
