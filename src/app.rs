use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use eframe::egui;

use crate::state::AppState;
use crate::ui::{map, panels};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct HeatSpotApp {
    pub state: AppState,
}

impl HeatSpotApp {
    pub fn new(cc: &eframe::CreationContext<'_>, mut state: AppState) -> Self {
        if let Some(path) = state.config.font_path.clone() {
            match install_font(&cc.egui_ctx, &path) {
                Ok(()) => log::info!("Using font {}", path.display()),
                Err(e) => log::warn!("Could not install font: {e:#}"),
            }
        }

        state.ensure_loaded();
        Self { state }
    }
}

/// Add a TTF/OTF font as fallback so province names in Thai script render.
fn install_font(ctx: &egui::Context, path: &Path) -> Result<()> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let name = "region_names".to_string();

    let mut fonts = egui::FontDefinitions::default();
    fonts
        .font_data
        .insert(name.clone(), Arc::new(egui::FontData::from_owned(bytes)));
    for family in [egui::FontFamily::Proportional, egui::FontFamily::Monospace] {
        fonts.families.entry(family).or_default().push(name.clone());
    }
    ctx.set_fonts(fonts);
    Ok(())
}

impl eframe::App for HeatSpotApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters + count table ----
        egui::SidePanel::left("filter_panel")
            .default_width(300.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // Pipeline reruns only when the datasets or the filter changed.
        self.state.refresh();

        // ---- Central panel: map ----
        egui::CentralPanel::default().show(ctx, |ui| {
            map::heat_map(ui, &self.state);
        });
    }
}
