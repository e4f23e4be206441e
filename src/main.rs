mod app;
mod cli;
mod state;
mod ui;

use anyhow::{anyhow, Context};
use clap::Parser;
use eframe::egui;

use abundance_viewer::batch;
use abundance_viewer::config::AnalysisConfig;
use app::AbundanceApp;
use cli::Args;
use state::AppState;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = AnalysisConfig::load_or_default(&args.config);
    args.apply_overrides(&mut config);
    log::info!(
        "solar reference: Ba={} Eu={} La={}",
        config.solar.barium,
        config.solar.europium,
        config.solar.lanthanum
    );

    if args.nogui {
        let input = args
            .input
            .as_deref()
            .context("--nogui needs a STAR_TABLE argument")?;
        batch::run(input, &config)?;
        return Ok(());
    }

    let mut state = AppState::new(config);
    if let Some(path) = &args.input {
        state.load(path);
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Abundance Viewer – Red Giant Field Stars",
        options,
        Box::new(move |_cc| Ok(Box::new(AbundanceApp::new(state)))),
    )
    .map_err(|e| anyhow!("viewer failed: {e}"))
}
