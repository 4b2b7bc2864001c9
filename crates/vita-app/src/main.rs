use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::signal;
use vita_config::Config;
use vita_config::logging::LoggingConfig;
use vita_core::state::AppState;

mod controller;
mod events;
mod io;
mod logging;
mod ui;
mod views;

#[cfg(test)]
mod tests;

use self::controller::AppController;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    logging::init(&LoggingConfig::from_env())?;

    let config = Config::from_env().context("failed to load configuration")?;
    let state = Arc::new(AppState::new(config).context("failed to create AI client")?);

    // Shutdown future (Ctrl+C)
    let shutdown = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to listen for ctrl+c: {e}");
            std::future::pending::<()>().await;
        }
    };

    let controller = AppController::new(state).await;
    run(controller, shutdown).await
}

pub async fn run(controller: AppController, shutdown: impl Future<Output = ()>) -> anyhow::Result<()> {
    let mut tasks = controller.spawn_tasks();
    tracing::info!("Vita started");

    tokio::select! {
        _ = shutdown => {
            tracing::info!("Shutdown requested");
        }
        Some(result) = tasks.join_next() => {
            match result {
                Ok(Ok(())) => tracing::info!("task exited"),
                Ok(Err(e)) => tracing::error!("task failed: {e:#}"),
                Err(e) => tracing::error!("task panicked: {e}"),
            }
        }
    }

    controller.shutdown();

    // Let the views unmount so the camera and timers are released
    let drain = async { while tasks.join_next().await.is_some() {} };
    if tokio::time::timeout(Duration::from_secs(2), drain).await.is_err() {
        tracing::warn!("tasks did not stop in time, aborting");
        tasks.abort_all();
    }

    Ok(())
}
