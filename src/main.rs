#![cfg_attr(all(windows, not(debug_assertions)), windows_subsystem = "windows")]

use anyhow::Result;
use eframe::egui;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

mod app;
mod app_ui;
mod client;
mod credentials;
mod error;
mod postprocess;

use app::ChatApp;
use error::ChatError;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([750.0, 650.0]),
        ..Default::default()
    };

    // Set when the key prompt is cancelled or dismissed; checked after the
    // event loop exits so the process can fail with a credential error.
    let access_denied = Arc::new(AtomicBool::new(false));
    let app_flag = access_denied.clone();

    eframe::run_native(
        "Cortex AI",
        options,
        Box::new(move |cc| Box::new(ChatApp::new(cc, app_flag))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run app: {}", e))?;

    if access_denied.load(Ordering::Relaxed) {
        return Err(ChatError::MissingCredential.into());
    }
    Ok(())
}
