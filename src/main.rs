mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use app::HeatSpotApp;
use config::DashboardConfig;
use eframe::egui;
use state::AppState;

fn main() -> eframe::Result {
    env_logger::init();

    let (config, bounds) = match DashboardConfig::load()
        .and_then(|c| c.intensity_bounds().map(|b| (c, b)))
    {
        Ok(loaded) => loaded,
        Err(e) => {
            log::error!("Invalid configuration: {e:#}");
            std::process::exit(2);
        }
    };
    let state = AppState::new(config, bounds);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 820.0])
            .with_min_inner_size([700.0, 450.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Heat-Spot Viewer – Thai Provinces",
        options,
        Box::new(|cc| Ok(Box::new(HeatSpotApp::new(cc, state)))),
    )
}
