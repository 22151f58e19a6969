use std::{path::PathBuf, sync::Arc, time::Duration};

mod backend_bridge;
mod controller;
mod settings;
mod ui;

use anyhow::{anyhow, Context};
use assistant_client::{Assistant, AssistantOptions, GeminiAssistant, MissingAssistant};
use clap::Parser;
use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::settings::{load_settings, Settings};
use crate::ui::{BallotApp, StartupConfig};

#[derive(Parser, Debug)]
#[command(name = "ballot-booth", about = "Desktop voting booth with an election assistant")]
struct Args {
    /// Ballot settings file (TOML). Defaults to ./ballot.toml, then
    /// <user config dir>/ballot_booth/ballot.toml, when present.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn build_assistant(settings: &Settings) -> anyhow::Result<Arc<dyn Assistant>> {
    let Some(api_key) = settings.assistant_api_key.clone() else {
        return Ok(Arc::new(MissingAssistant));
    };

    let options = AssistantOptions::new(api_key)
        .with_base_url(settings.assistant_base_url.clone())
        .with_model(settings.assistant_model.clone())
        .with_timeout(Duration::from_secs(settings.assistant_timeout_seconds));
    let assistant = GeminiAssistant::new(options).context("failed to configure assistant")?;
    tracing::info!(endpoint = %assistant.endpoint(), "assistant configured");
    Ok(Arc::new(assistant))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let settings = load_settings(args.config.as_deref())?;
    tracing::info!(
        candidates = settings.ballot.candidates.len(),
        vote_limit = settings.ballot.vote_limit,
        required = %settings.ballot.required_candidate,
        "ballot loaded"
    );

    let assistant = build_assistant(&settings)?;
    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(32);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(256);
    backend_bridge::runtime::launch(cmd_rx, ui_tx, assistant);

    let startup = StartupConfig::from_settings(&settings);
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Ballot Booth")
            .with_inner_size([1100.0, 820.0])
            .with_min_inner_size([720.0, 560.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Ballot Booth",
        options,
        Box::new(move |_cc| Ok(Box::new(BallotApp::bootstrap(cmd_tx, ui_rx, startup)))),
    )
    .map_err(|err| anyhow!("desktop ui exited with error: {err}"))
}
