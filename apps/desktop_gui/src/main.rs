use std::path::PathBuf;

mod config;
mod controller;
mod ui;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use crossbeam_channel::bounded;
use eframe::egui;
use shared::protocol::GestureEvent;
use tracing_subscriber::EnvFilter;

use crate::{
    controller::orchestration::GESTURE_QUEUE_CAPACITY,
    ui::{MorphApp, PersistedSurfaceSettings, StartupConfig, SETTINGS_STORAGE_KEY},
};

#[derive(Parser, Debug)]
struct Args {
    /// Surface settings file; missing files fall back to defaults.
    #[arg(long, default_value = "morph.toml")]
    config: PathBuf,
    /// Initial grid column count, overriding the settings file.
    #[arg(long)]
    columns: Option<usize>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let explicit_columns = args.columns.is_some();
    let mut settings = config::load_settings(&args.config)
        .with_context(|| format!("failed to load settings from '{}'", args.config.display()))?;
    if let Some(columns) = args.columns {
        settings.columns = columns;
        settings.validate().context("invalid --columns")?;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let (gesture_tx, gesture_rx) = bounded::<GestureEvent>(GESTURE_QUEUE_CAPACITY);
    let startup = StartupConfig::from(&settings);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Strip / Grid Morph")
            .with_inner_size([settings.window_width, settings.window_height])
            .with_min_inner_size([320.0, 480.0]),
        ..Default::default()
    };
    tracing::info!(
        columns = startup.columns,
        items = startup.item_count,
        "starting morph surface"
    );
    eframe::run_native(
        "Strip / Grid Morph",
        options,
        Box::new(|cc| {
            // An explicit --columns beats the remembered column count.
            let storage = cc.storage.filter(|_| !explicit_columns);
            let persisted = storage.and_then(|storage| {
                storage
                    .get_string(SETTINGS_STORAGE_KEY)
                    .and_then(|text| serde_json::from_str::<PersistedSurfaceSettings>(&text).ok())
            });
            Ok(Box::new(MorphApp::new(
                gesture_tx, gesture_rx, persisted, startup,
            )))
        }),
    )
    .map_err(|err| anyhow!("desktop surface exited with error: {err}"))
}
