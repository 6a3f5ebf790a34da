use eframe::egui::{Align2, Color32, RichText, Ui};
use egui_plot::{Legend, Line, Plot, PlotPoint, PlotPoints, Points, Text};
use geo::Point;

use crate::color::{band_weight, heat_band, heat_color, region_color, HEAT_BANDS};
use crate::data::model::{Aggregation, Region};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Province map (central panel)
// ---------------------------------------------------------------------------

/// Render region outlines shaded by count plus the heat-spot overlay.
pub fn heat_map(ui: &mut Ui, state: &AppState) {
    let (Some(regions), Some(result)) = (&state.regions, &state.result) else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Load a boundary file and a detection folder  (File → …)");
        });
        return;
    };
    let layer = &regions.value;
    if layer.is_empty() || layer.len() != result.counts.len() {
        // Regions were swapped and the pipeline has not caught up yet.
        return;
    }

    let max_count = result.max_count();
    let label_fields = &state.config.label_fields;

    Plot::new("heat_map")
        .legend(Legend::default())
        .data_aspect(1.0)
        .x_axis_label("Longitude")
        .y_axis_label("Latitude")
        .show_x(false)
        .show_y(false)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            let hovered = plot_ui
                .pointer_coordinate()
                .and_then(|p| layer.locate(Point::new(p.x, p.y)).map(|i| (i, p)));

            for (i, (region, count)) in layer.regions.iter().zip(&result.counts).enumerate() {
                let highlight = hovered.is_some_and(|(h, _)| h == i);
                let color = region_color(count.count, max_count);
                let width = if highlight { 2.5 } else { 0.8 };
                for ring in outline_rings(region) {
                    plot_ui.line(Line::new(ring).color(color).width(width));
                }
            }

            for (band, points) in banded_points(result).into_iter().enumerate() {
                if points.is_empty() {
                    continue;
                }
                let lo = band as f64 / HEAT_BANDS as f64;
                let hi = (band + 1) as f64 / HEAT_BANDS as f64;
                plot_ui.points(
                    Points::new(points)
                        .radius(2.0 + band as f32)
                        .color(heat_color(band_weight(band)))
                        .name(format!("Heat {lo:.1}–{hi:.1}")),
                );
            }

            if let Some((i, at)) = hovered {
                let region = &layer.regions[i];
                let mut label = region.name.clone();
                for field in label_fields {
                    if let Some(value) = region.attributes.get(field) {
                        label.push_str(&format!(" ({value})"));
                    }
                }
                label.push_str(&format!("\nHeat spots: {}", result.counts[i].count));
                plot_ui.text(
                    Text::new(PlotPoint::new(at.x, at.y), RichText::new(label).strong())
                        .color(Color32::WHITE)
                        .anchor(Align2::LEFT_BOTTOM),
                );
            }
        });
}

/// Exterior and interior rings of a region as plot lines.
fn outline_rings(region: &Region) -> Vec<PlotPoints> {
    region
        .geometry
        .0
        .iter()
        .flat_map(|poly| std::iter::once(poly.exterior()).chain(poly.interiors()))
        .map(|ring| ring.0.iter().map(|c| [c.x, c.y]).collect())
        .collect()
}

/// Split heat points into colour bands so each band is one plot item.
fn banded_points(result: &Aggregation) -> Vec<Vec<[f64; 2]>> {
    let mut bands = vec![Vec::new(); HEAT_BANDS];
    for p in &result.points {
        bands[heat_band(p.weight)].push([p.longitude, p.latitude]);
    }
    bands
}
