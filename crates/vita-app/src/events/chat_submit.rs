use std::sync::Arc;

use kanal::AsyncSender;
use vita_core::SubmitRejection;
use vita_core::state::AppState;
use vita_types::{AppEvent, ChatMessage};

use crate::events::notice;
use crate::views::Views;

pub async fn handle_chat_submit(
    state: &Arc<AppState>,
    views: &mut Views,
    text: String,
    app_to_ui_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let Some(ai) = views.ai_mut() else {
        return Ok(());
    };
    let chat = ai.chat();
    let mounted = ai.view_token();

    let begun = chat.lock().await.begin_turn(&text);
    let turn = match begun {
        Ok(turn) => turn,
        Err(SubmitRejection::RequestPending) => {
            notice(app_to_ui_tx, "Please wait for the current reply.").await;
            return Ok(());
        }
        Err(e) => {
            tracing::debug!("Chat submit ignored: {}", e);
            return Ok(());
        }
    };

    app_to_ui_tx
        .send(AppEvent::ChatMessage(ChatMessage::user(turn.message())))
        .await?;
    app_to_ui_tx.send(AppEvent::ChatPending(true)).await?;

    let orchestrator = state.ai.clone();
    let tx = app_to_ui_tx.clone();
    tokio::spawn(async move {
        let completed = turn.run(&orchestrator).await;
        if let Some(kind) = completed.reply.failure {
            tracing::warn!("Chat reply replaced by fallback ({:?})", kind);
        }
        let reply = chat.lock().await.finish_turn(completed).clone();

        if mounted.is_cancelled() {
            tracing::debug!("Chat reply arrived after the AI view closed");
            return;
        }
        let _ = tx.send(AppEvent::ChatMessage(reply)).await;
        let _ = tx.send(AppEvent::ChatPending(false)).await;
    });

    Ok(())
}
