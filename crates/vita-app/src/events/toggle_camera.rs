use kanal::AsyncSender;
use vita_types::AppEvent;

use crate::events::notice;
use crate::views::Views;

pub async fn handle_camera_toggle(
    views: &mut Views,
    app_to_ui_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    match views.ar_mut() {
        Some(ar) => {
            ar.toggle_camera().await;

            let vitals = ar.vitals().await;
            tracing::info!(
                "Camera {} (streaming: {}, scan: {})",
                if ar.is_camera_on() { "on" } else { "off" },
                ar.is_streaming(),
                vitals.status
            );
        }
        None => notice(app_to_ui_tx, "The camera is only available in the AR view (/ar).").await,
    }

    Ok(())
}
