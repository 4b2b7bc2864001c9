use kanal::AsyncSender;
use vita_types::{AppEvent, ToolSelection, View};

use crate::events::notice;
use crate::views::Views;

pub async fn handle_view_selection(
    views: &mut Views,
    view: View,
    app_to_ui_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    if !views.select_view(view).await {
        tracing::debug!("View {:?} already shown", view);
        return Ok(());
    }

    // Fresh AI view: chat tool with the greeting
    if let Some(ai) = views.ai_mut() {
        app_to_ui_tx
            .send(AppEvent::ToolChanged(ai.active()))
            .await?;

        let messages = ai.chat().lock().await.messages().to_vec();
        for message in messages {
            app_to_ui_tx.send(AppEvent::ChatMessage(message)).await?;
        }
    }

    Ok(())
}

pub async fn handle_tool_selection(
    views: &mut Views,
    tool: ToolSelection,
    app_to_ui_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    if views.view() != View::Ai {
        notice(app_to_ui_tx, "Open the AI tools with /ai first.").await;
        return Ok(());
    }

    if views.select_tool(tool).await && tool == ToolSelection::Image {
        notice(
            app_to_ui_tx,
            "Load a meal photo with /load <path>, then /analyze.",
        )
        .await;
    }

    Ok(())
}
