use std::sync::Arc;

use kanal::AsyncSender;
use vita_core::SubmitRejection;
use vita_core::state::AppState;
use vita_types::{AppEvent, ToolSelection};

use crate::events::notice;
use crate::views::{ToolPanel, Views};

pub async fn handle_quick_query(
    state: &Arc<AppState>,
    views: &mut Views,
    prompt: String,
    app_to_ui_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let Some(ai) = views.ai_mut() else {
        return Ok(());
    };
    let ToolPanel::Quick(panel) = ai.panel() else {
        return Ok(());
    };
    let panel = panel.clone();
    let mounted = ai.panel_token();

    let begun = panel.lock().await.begin(&prompt);
    let request = match begun {
        Ok(request) => request,
        Err(SubmitRejection::RequestPending) => {
            notice(app_to_ui_tx, "Please wait for the current request to finish.").await;
            return Ok(());
        }
        Err(e) => {
            tracing::debug!("Quick query ignored: {}", e);
            return Ok(());
        }
    };

    app_to_ui_tx
        .send(AppEvent::PanelBusy {
            tool: ToolSelection::Quick,
            busy: true,
        })
        .await?;

    let orchestrator = state.ai.clone();
    let tx = app_to_ui_tx.clone();
    tokio::spawn(async move {
        let reply = request.run(&orchestrator).await;
        let text = panel.lock().await.finish(reply).to_string();

        if mounted.is_cancelled() {
            tracing::debug!("Quick result arrived after the panel closed");
            return;
        }
        let _ = tx
            .send(AppEvent::PanelBusy {
                tool: ToolSelection::Quick,
                busy: false,
            })
            .await;
        let _ = tx.send(AppEvent::QuickResponse(text)).await;
    });

    Ok(())
}
