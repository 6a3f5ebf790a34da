use eframe::egui::{self, Color32, RichText, Ui};
use egui_extras::{Column, DatePickerButton, TableBuilder};

use crate::state::{AppState, FilterMode, TableSort};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets and count table
// ---------------------------------------------------------------------------

/// Render the left panel: date filter on top, province counts below.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filter Options");
    ui.separator();

    ui.strong("Filter mode");
    ui.horizontal(|ui: &mut Ui| {
        ui.radio_value(&mut state.mode, FilterMode::Exact, "Exact date");
        ui.radio_value(&mut state.mode, FilterMode::Range, "Date range");
    });

    egui::Grid::new("date_inputs")
        .num_columns(2)
        .spacing([8.0, 4.0])
        .show(ui, |ui: &mut Ui| match state.mode {
            FilterMode::Exact => {
                ui.label("Date");
                ui.add(DatePickerButton::new(&mut state.exact_date).id_salt("exact_date"));
                ui.end_row();
            }
            FilterMode::Range => {
                ui.label("Start");
                ui.add(DatePickerButton::new(&mut state.start_date).id_salt("start_date"));
                ui.end_row();
                ui.label("End");
                ui.add(DatePickerButton::new(&mut state.end_date).id_salt("end_date"));
                ui.end_row();
            }
        });

    if let Some(err) = &state.filter_error {
        ui.label(RichText::new(err).color(Color32::RED));
    }

    if let Some(ds) = &state.detections {
        match ds.value.date_span() {
            Some((first, last)) => ui.small(format!("Data covers {first} → {last}")),
            None => ui.small("No detections loaded"),
        };
    }
    ui.small(format!(
        "Heat weight: brightness {:.0}–{:.0} K",
        state.bounds.min(),
        state.bounds.max()
    ));

    ui.separator();
    ui.heading("Heat spots per province");
    count_table(ui, state);
}

/// Two-column table (province, count); header clicks change the ordering.
fn count_table(ui: &mut Ui, state: &mut AppState) {
    if state.result.is_none() {
        ui.label("No data.");
        return;
    }

    let mut clicked: Option<TableSort> = None;
    let sort = state.table_sort;
    let rows = &state.table_rows;

    TableBuilder::new(ui)
        .striped(true)
        .resizable(false)
        .column(Column::remainder())
        .column(Column::auto().at_least(70.0))
        .header(22.0, |mut header| {
            header.col(|ui: &mut Ui| {
                let marker = if sort == TableSort::NameAsc { " ⏶" } else { "" };
                if ui.button(format!("Province{marker}")).clicked() {
                    clicked = Some(TableSort::NameAsc);
                }
            });
            header.col(|ui: &mut Ui| {
                let (marker, next) = match sort {
                    TableSort::CountDesc => (" ⏷", TableSort::CountAsc),
                    TableSort::CountAsc => (" ⏶", TableSort::CountDesc),
                    TableSort::NameAsc => ("", TableSort::CountDesc),
                };
                if ui.button(format!("Heat Spots{marker}")).clicked() {
                    clicked = Some(next);
                }
            });
        })
        .body(|body| {
            body.rows(18.0, rows.len(), |mut row| {
                let entry = &rows[row.index()];
                row.col(|ui: &mut Ui| {
                    ui.label(&entry.region);
                });
                row.col(|ui: &mut Ui| {
                    ui.label(entry.count.to_string());
                });
            });
        });

    if let Some(next) = clicked {
        state.set_table_sort(next);
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open boundaries…").clicked() {
                open_boundary_dialog(state);
                ui.close_menu();
            }
            if ui.button("Open detection folder…").clicked() {
                open_detections_dialog(state);
                ui.close_menu();
            }
            if ui.button("Reload").clicked() {
                state.reload();
                ui.close_menu();
            }
            ui.separator();
            let can_export = state.result.is_some();
            if ui
                .add_enabled(can_export, egui::Button::new("Export counts…"))
                .clicked()
            {
                export_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let (Some(regions), Some(ds)) = (&state.regions, &state.detections) {
            let unmatched = state.result.as_ref().map_or(0, |r| r.unmatched);
            ui.label(format!(
                "{} provinces, {} detections loaded, {} in filter ({} outside provinces)",
                regions.value.len(),
                ds.value.len(),
                state.filtered_len,
                unmatched
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_boundary_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open province boundaries")
        .add_filter("GeoJSON", &["geojson", "json"])
        .pick_file();

    if let Some(path) = file {
        log::info!("Switching boundaries to {}", path.display());
        state.set_boundary_path(path);
    }
}

pub fn open_detections_dialog(state: &mut AppState) {
    let dir = rfd::FileDialog::new()
        .set_title("Open detection folder (Parquet / CSV)")
        .pick_folder();

    if let Some(dir) = dir {
        log::info!("Switching detections to {}", dir.display());
        state.set_detections_dir(dir);
    }
}

pub fn export_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export heat-spot counts")
        .add_filter("CSV", &["csv"])
        .set_file_name("heat_spot_counts.csv")
        .save_file();

    if let Some(path) = file {
        match crate::data::export::export_counts(&path, &state.table_rows) {
            Ok(()) => {
                log::info!("Exported {} rows to {}", state.table_rows.len(), path.display());
                state.status_message = None;
            }
            Err(e) => {
                log::error!("Failed to export counts: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
