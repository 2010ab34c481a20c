use std::path::Path;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use eframe::egui;

use games_dash::app::GamesDashApp;
use games_dash::cli::Args;
use games_dash::config::DashConfig;
use games_dash::data::catalog::FilterCatalog;
use games_dash::data::loader;
use games_dash::export;
use games_dash::state::DashboardState;

fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let mut config = DashConfig::load_or_default(&args.config);
    if let Some(path) = &args.data {
        config.data.path = path.clone();
    }
    if let Some(min_year) = args.min_year {
        config.data.min_year = min_year;
    }

    // Load failure aborts startup; the dashboard never runs on partial data.
    let path = Path::new(&config.data.path);
    let dataset = loader::load_file(path, &config.data.loader_config())
        .inspect_err(|e| log::error!("Failed to load {}: {e}", path.display()))
        .with_context(|| format!("loading dataset {}", path.display()))?;

    if let Some(target) = &args.export {
        let catalog = FilterCatalog::from_dataset(&dataset);
        let selection =
            export::selection_from_args(&catalog, &args.genres, &args.ratings, args.years);
        return export::export_to(&dataset, &selection, target);
    }

    let state = DashboardState::new(dataset).with_source(config.data.path.clone());
    let app = GamesDashApp::new(state);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(config.window.title.clone())
            .with_inner_size([config.window.width, config.window.height])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        &config.window.title,
        options,
        Box::new(|_cc| Ok(Box::new(app))),
    )
    .map_err(|e| anyhow!("dashboard window failed: {e}"))
}
