use std::sync::Arc;

use kanal::{AsyncReceiver, AsyncSender};
use tokio_util::sync::CancellationToken;
use vita_camera::CaptureDevice;
use vita_core::state::AppState;
use vita_types::{AppEvent, ToolSelection, UiEvent};

use crate::views::Views;

pub mod analyze_image;
pub mod chat_submit;
pub mod quick_query;
pub mod select_view;
pub mod toggle_camera;

use analyze_image::{handle_image_analysis, handle_image_load, handle_image_prompt};
use chat_submit::handle_chat_submit;
use quick_query::handle_quick_query;
use select_view::{handle_tool_selection, handle_view_selection};
use toggle_camera::handle_camera_toggle;

/// App's main loop
pub async fn event_loop(
    state: Arc<AppState>,
    device: Arc<dyn CaptureDevice>,
    ui_to_app_rx: AsyncReceiver<AppEvent>,
    app_to_ui_tx: AsyncSender<AppEvent>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    app_to_ui_tx.send(AppEvent::BackendReady).await?;

    let config = state.config.read().await.clone();
    let views = Views::mount(device, &config, app_to_ui_tx.clone()).await;

    run_event_loop(state, views, ui_to_app_rx, app_to_ui_tx, cancel).await
}

/// Process events against already mounted views until cancelled or closed
pub async fn run_event_loop(
    state: Arc<AppState>,
    mut views: Views,
    ui_to_app_rx: AsyncReceiver<AppEvent>,
    app_to_ui_tx: AsyncSender<AppEvent>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    tracing::info!("[EVENT_LOOP] Starting main loop, waiting for events");
    loop {
        let event = tokio::select! {
            _ = cancel.cancelled() => break,
            event = ui_to_app_rx.recv() => event?,
        };

        tracing::debug!(
            "[EVENT_LOOP] EVENT RECEIVED: {:?}",
            std::mem::discriminant(&event)
        );

        match event {
            AppEvent::UiEvent(UiEvent::Close) => {
                tracing::info!("[EVENT_LOOP] Close requested");
                break;
            }
            AppEvent::UiEvent(event) => {
                handle_ui_event(&state, &mut views, &app_to_ui_tx, event).await?;
            }
            _ => {
                // Outbound events, nothing to do in the backend
            }
        }
    }

    // Unmount: releases the camera and the vitals timers
    drop(views);
    tracing::info!("[EVENT_LOOP] Stopped");
    Ok(())
}

async fn handle_ui_event(
    state: &Arc<AppState>,
    views: &mut Views,
    app_to_ui_tx: &AsyncSender<AppEvent>,
    event: UiEvent,
) -> anyhow::Result<()> {
    match event {
        UiEvent::SelectView(view) => {
            handle_view_selection(views, view, app_to_ui_tx).await?;
        }
        UiEvent::SelectTool(tool) => {
            handle_tool_selection(views, tool, app_to_ui_tx).await?;
        }
        UiEvent::ToggleCamera => {
            handle_camera_toggle(views, app_to_ui_tx).await?;
        }
        UiEvent::TextInput(text) => {
            let Some(tool) = views.ai_mut().map(|ai| ai.active()) else {
                notice(app_to_ui_tx, "Open the AI tools with /ai to ask a question.").await;
                return Ok(());
            };
            match tool {
                ToolSelection::Chat => handle_chat_submit(state, views, text, app_to_ui_tx).await?,
                ToolSelection::Image => handle_image_prompt(views, text, app_to_ui_tx).await?,
                ToolSelection::Quick => handle_quick_query(state, views, text, app_to_ui_tx).await?,
            }
        }
        UiEvent::LoadImage(path) => {
            handle_image_load(views, &path, app_to_ui_tx).await?;
        }
        UiEvent::SetImagePrompt(text) => {
            handle_image_prompt(views, text, app_to_ui_tx).await?;
        }
        UiEvent::AnalyzeImage => {
            handle_image_analysis(state, views, app_to_ui_tx).await?;
        }
        UiEvent::Close => {}
    }

    Ok(())
}

/// One-line message for the user; dropped if the renderer is gone
pub(crate) async fn notice(app_to_ui_tx: &AsyncSender<AppEvent>, text: &str) {
    let _ = app_to_ui_tx.send(AppEvent::Notice(text.to_string())).await;
}
