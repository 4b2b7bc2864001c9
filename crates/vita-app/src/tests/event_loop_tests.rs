use std::sync::Arc;
use std::time::Duration;

use vita_ai::testing::{Scripted, ScriptedBackend};
use vita_ai::{IMAGE_FALLBACK, QUICK_FALLBACK};
use vita_camera::CameraError;
use vita_core::chat::GREETING;
use vita_types::{AppEvent, ChatMessage, Role, ScanStatus, ToolSelection, UiEvent, View};

use super::{FakeDevice, Harness};

const JPEG_HEADER: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F'];

fn scripted(script: impl IntoIterator<Item = Scripted>) -> Arc<ScriptedBackend> {
    Arc::new(ScriptedBackend::new(script))
}

fn idle() -> Arc<ScriptedBackend> {
    scripted(Vec::<Scripted>::new())
}

async fn open_tool(harness: &Harness, tool: ToolSelection) {
    harness.send(UiEvent::SelectView(View::Ai)).await;
    harness
        .wait_for(|e| matches!(e, AppEvent::ChatMessage(m) if m.text == GREETING))
        .await;
    if tool != ToolSelection::Chat {
        harness.send(UiEvent::SelectTool(tool)).await;
        harness
            .wait_for(|e| matches!(e, AppEvent::ToolChanged(t) if *t == tool))
            .await;
    }
}

#[tokio::test(start_paused = true)]
async fn test_camera_on_detects_and_streams_vitals() {
    let device = FakeDevice::working();
    let harness = Harness::start(device.clone(), idle(), true).await;

    harness
        .wait_for(|e| matches!(e, AppEvent::CameraStatus(s) if s.is_on))
        .await;
    assert_eq!(device.live_tracks(), 1);

    harness
        .wait_for(|e| {
            matches!(
                e,
                AppEvent::ScanStatusChanged {
                    status: ScanStatus::Detected,
                    ..
                }
            )
        })
        .await;

    match harness
        .wait_for(|e| matches!(e, AppEvent::VitalsUpdate(_)))
        .await
    {
        AppEvent::VitalsUpdate(reading) => {
            assert_eq!(reading.systolic, 122.0);
            assert_eq!(reading.heart_rate, 78.0);
        }
        _ => unreachable!(),
    }
}

#[tokio::test(start_paused = true)]
async fn test_camera_denied_then_retry() {
    let device = FakeDevice::failing([CameraError::PermissionDenied]);
    let harness = Harness::start(device.clone(), idle(), true).await;

    let error = harness
        .wait_for(|e| {
            matches!(
                e,
                AppEvent::ScanStatusChanged {
                    status: ScanStatus::Error,
                    ..
                }
            )
        })
        .await;
    match error {
        AppEvent::ScanStatusChanged { error, .. } => assert_eq!(
            error.as_deref(),
            Some(CameraError::PermissionDenied.user_message())
        ),
        _ => unreachable!(),
    }
    assert_eq!(device.opened(), 0);

    // Off, then on again: scanning with the error cleared
    harness.send(UiEvent::ToggleCamera).await;
    harness
        .wait_for(|e| matches!(e, AppEvent::CameraStatus(s) if !s.is_on))
        .await;
    harness.send(UiEvent::ToggleCamera).await;
    harness
        .wait_for(|e| {
            matches!(
                e,
                AppEvent::ScanStatusChanged {
                    status: ScanStatus::Scanning,
                    error: None
                }
            )
        })
        .await;
    harness
        .wait_for(|e| matches!(e, AppEvent::CameraStatus(s) if s.is_on && s.error_message.is_none()))
        .await;
    assert_eq!(device.live_tracks(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_leaving_ar_view_releases_camera_and_timers() {
    let device = FakeDevice::working();
    let harness = Harness::start(device.clone(), idle(), true).await;
    harness
        .wait_for(|e| matches!(e, AppEvent::VitalsUpdate(_)))
        .await;

    harness.send(UiEvent::SelectView(View::Ai)).await;
    harness
        .wait_for(|e| matches!(e, AppEvent::ToolChanged(ToolSelection::Chat)))
        .await;
    assert_eq!(device.live_tracks(), 0);

    tokio::time::sleep(Duration::from_secs(30)).await;
    let late = harness.drain();
    assert!(
        !late
            .iter()
            .any(|e| matches!(e, AppEvent::VitalsUpdate(_) | AppEvent::ScanStatusChanged { .. })),
        "{late:?}"
    );
}

#[tokio::test]
async fn test_camera_toggle_outside_ar_view() {
    let harness = Harness::start(FakeDevice::working(), idle(), false).await;
    open_tool(&harness, ToolSelection::Chat).await;

    harness.send(UiEvent::ToggleCamera).await;
    let event = harness
        .wait_for(|e| matches!(e, AppEvent::Notice(_)))
        .await;
    assert!(matches!(event, AppEvent::Notice(text) if text.contains("AR view")));
}

#[tokio::test]
async fn test_chat_round_trip() {
    let backend = scripted([Scripted::text("Drink water.")]);
    let harness = Harness::start(FakeDevice::working(), backend.clone(), false).await;
    open_tool(&harness, ToolSelection::Chat).await;

    harness
        .send(UiEvent::TextInput("hydration?".to_string()))
        .await;

    let user = harness
        .wait_for(|e| matches!(e, AppEvent::ChatMessage(_)))
        .await;
    assert!(matches!(user, AppEvent::ChatMessage(m) if m == ChatMessage::user("hydration?")));
    assert!(matches!(harness.next().await, AppEvent::ChatPending(true)));

    let reply = harness
        .wait_for(|e| matches!(e, AppEvent::ChatMessage(_)))
        .await;
    assert!(matches!(reply, AppEvent::ChatMessage(m) if m == ChatMessage::model("Drink water.")));
    assert!(matches!(harness.next().await, AppEvent::ChatPending(false)));
    assert_eq!(backend.call_count(), 1);
}

#[tokio::test]
async fn test_blank_chat_input_is_ignored() {
    let backend = idle();
    let harness = Harness::start(FakeDevice::working(), backend.clone(), false).await;
    open_tool(&harness, ToolSelection::Chat).await;

    harness.send(UiEvent::TextInput("   ".to_string())).await;
    harness.send(UiEvent::TextInput("real".to_string())).await;

    // The first message the log gains is the second input
    let first = harness
        .wait_for(|e| matches!(e, AppEvent::ChatMessage(_)))
        .await;
    assert!(matches!(first, AppEvent::ChatMessage(m) if m.role == Role::User && m.text == "real"));
    harness
        .wait_for(|e| matches!(e, AppEvent::ChatPending(false)))
        .await;
    assert_eq!(backend.call_count(), 1);
}

#[tokio::test]
async fn test_chat_submit_while_pending_is_rejected() {
    let backend = Arc::new(ScriptedBackend::gated([Scripted::text("first answer")]));
    let harness = Harness::start(FakeDevice::working(), backend.clone(), false).await;
    open_tool(&harness, ToolSelection::Chat).await;

    harness.send(UiEvent::TextInput("first".to_string())).await;
    harness
        .wait_for(|e| matches!(e, AppEvent::ChatPending(true)))
        .await;

    harness.send(UiEvent::TextInput("second".to_string())).await;
    let notice = harness.next().await;
    assert!(matches!(notice, AppEvent::Notice(_)), "{notice:?}");
    assert_eq!(backend.call_count(), 1);

    backend.release(1);
    let reply = harness
        .wait_for(|e| matches!(e, AppEvent::ChatMessage(_)))
        .await;
    assert!(matches!(reply, AppEvent::ChatMessage(m) if m.text == "first answer"));
}

#[tokio::test]
async fn test_chat_history_survives_tool_switch() {
    let backend = scripted([Scripted::text("one"), Scripted::text("two")]);
    let harness = Harness::start(FakeDevice::working(), backend.clone(), false).await;
    open_tool(&harness, ToolSelection::Chat).await;

    harness.send(UiEvent::TextInput("a".to_string())).await;
    harness
        .wait_for(|e| matches!(e, AppEvent::ChatPending(false)))
        .await;

    harness.send(UiEvent::SelectTool(ToolSelection::Quick)).await;
    harness.send(UiEvent::SelectTool(ToolSelection::Chat)).await;
    harness
        .wait_for(|e| matches!(e, AppEvent::ToolChanged(ToolSelection::Chat)))
        .await;

    harness.send(UiEvent::TextInput("b".to_string())).await;
    harness
        .wait_for(|e| matches!(e, AppEvent::ChatPending(false)))
        .await;

    let calls = backend.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[1].request.contents.len(), 3);
}

#[tokio::test]
async fn test_quick_query_failure_shows_fallback() {
    let backend = scripted([Scripted::Transport]);
    let harness = Harness::start(FakeDevice::working(), backend.clone(), false).await;
    open_tool(&harness, ToolSelection::Quick).await;

    harness.send(UiEvent::TextInput("ping".to_string())).await;
    let response = harness
        .wait_for(|e| matches!(e, AppEvent::QuickResponse(_)))
        .await;
    assert!(matches!(response, AppEvent::QuickResponse(text) if text == QUICK_FALLBACK));
    assert_eq!(backend.calls()[0].model, "lite");
}

#[tokio::test]
async fn test_quick_result_dropped_after_tool_switch() {
    let backend = Arc::new(ScriptedBackend::gated([Scripted::text("late")]));
    let harness = Harness::start(FakeDevice::working(), backend.clone(), false).await;
    open_tool(&harness, ToolSelection::Quick).await;

    harness.send(UiEvent::TextInput("ping".to_string())).await;
    harness
        .wait_for(|e| matches!(e, AppEvent::PanelBusy { busy: true, .. }))
        .await;

    harness.send(UiEvent::SelectTool(ToolSelection::Chat)).await;
    harness
        .wait_for(|e| matches!(e, AppEvent::ToolChanged(ToolSelection::Chat)))
        .await;
    backend.release(1);

    // Round trip through the loop, then nothing from the old panel
    harness.send(UiEvent::SelectTool(ToolSelection::Image)).await;
    harness
        .wait_for(|e| matches!(e, AppEvent::ToolChanged(ToolSelection::Image)))
        .await;
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(
        !harness
            .drain()
            .iter()
            .any(|e| matches!(e, AppEvent::QuickResponse(_)))
    );
}

#[tokio::test]
async fn test_image_analysis_flow() {
    let backend = scripted([Scripted::text("320 kcal"), Scripted::Blocked]);
    let harness = Harness::start(FakeDevice::working(), backend.clone(), false).await;
    open_tool(&harness, ToolSelection::Image).await;

    harness.send(UiEvent::AnalyzeImage).await;
    harness
        .wait_for(|e| matches!(e, AppEvent::Notice(text) if text.starts_with("Load an image first")))
        .await;
    assert_eq!(backend.call_count(), 0);

    let path = std::env::temp_dir().join(format!("vita-meal-{}.jpg", std::process::id()));
    tokio::fs::write(&path, JPEG_HEADER).await.unwrap();

    harness.send(UiEvent::LoadImage(path.clone())).await;
    let loaded = harness
        .wait_for(|e| matches!(e, AppEvent::ImageLoaded { .. }))
        .await;
    assert!(matches!(
        loaded,
        AppEvent::ImageLoaded { ref mime_type, bytes } if mime_type == "image/jpeg" && bytes == JPEG_HEADER.len()
    ));

    harness.send(UiEvent::AnalyzeImage).await;
    let analysis = harness
        .wait_for(|e| matches!(e, AppEvent::ImageAnalysis(_)))
        .await;
    assert!(matches!(analysis, AppEvent::ImageAnalysis(text) if text == "320 kcal"));

    harness
        .send(UiEvent::SetImagePrompt("Protein only?".to_string()))
        .await;
    harness.send(UiEvent::AnalyzeImage).await;
    let analysis = harness
        .wait_for(|e| matches!(e, AppEvent::ImageAnalysis(_)))
        .await;
    assert!(matches!(analysis, AppEvent::ImageAnalysis(text) if text == IMAGE_FALLBACK));

    let calls = backend.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].model, "pro");
    assert_eq!(
        calls[1].request.contents[0].parts[1],
        vita_ai::Part::Text("Protein only?".to_string())
    );

    let _ = tokio::fs::remove_file(&path).await;
}

#[tokio::test]
async fn test_oversized_image_is_rejected() {
    let harness = Harness::start(FakeDevice::working(), idle(), false).await;
    open_tool(&harness, ToolSelection::Image).await;

    let path = std::env::temp_dir().join(format!("vita-big-{}.jpg", std::process::id()));
    tokio::fs::write(&path, vec![0u8; vita_ai::MAX_IMAGE_BYTES + 1])
        .await
        .unwrap();

    harness.send(UiEvent::LoadImage(path.clone())).await;
    harness
        .wait_for(|e| matches!(e, AppEvent::Notice(text) if text == "File size must be less than 4MB."))
        .await;

    let _ = tokio::fs::remove_file(&path).await;
}

#[tokio::test]
async fn test_text_in_ar_view_is_not_sent() {
    let backend = idle();
    let harness = Harness::start(FakeDevice::working(), backend.clone(), false).await;

    harness.send(UiEvent::TextInput("hello".to_string())).await;
    harness
        .wait_for(|e| matches!(e, AppEvent::Notice(_)))
        .await;
    assert_eq!(backend.call_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_close_unmounts_and_stops() {
    let device = FakeDevice::working();
    let harness = Harness::start(device.clone(), idle(), true).await;
    harness
        .wait_for(|e| matches!(e, AppEvent::CameraStatus(s) if s.is_on))
        .await;

    harness.send(UiEvent::Close).await;
    harness.task.await.unwrap().unwrap();
    assert_eq!(device.live_tracks(), 0);
    assert!(!harness.cancel.is_cancelled());
}
