use anyhow::{Context, Result};
use eframe::egui;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use voicebot::integration::VoicebotConfig;
use voicebot::ui::VoicebotApp;
use voicebot::VoicebotError;

/// Log the technical cause and surface the friendly description
fn startup_failure(e: VoicebotError) -> anyhow::Error {
    error!(recoverable = e.is_recoverable(), "Startup failed: {}", e);
    let message = e.user_message();
    anyhow::Error::new(e).context(message)
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "voicebot=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting voicebot");

    let config = VoicebotConfig::discover().map_err(startup_failure)?;
    config.validate().map_err(startup_failure)?;

    // Dispatch exchanges run here; the UI stays on the main thread
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;
    let handle = runtime.handle().clone();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([520.0, 720.0])
            .with_min_inner_size([360.0, 400.0])
            .with_title("Voice Assistant"),
        ..Default::default()
    };

    eframe::run_native(
        "Voicebot",
        options,
        Box::new(move |cc| {
            let app = VoicebotApp::new(cc, config, handle).map_err(|e| {
                error!("Window setup failed: {}", e);
                e.user_message()
            })?;
            Ok(Box::new(app))
        }),
    )
    .map_err(|e| anyhow::anyhow!("UI terminated with an error: {}", e))?;

    runtime.shutdown_background();
    Ok(())
}
