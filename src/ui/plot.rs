use eframe::egui::{Color32, Ui};
use egui_plot::{Line, MarkerShape, Plot, PlotPoints, Points};
use palette::Srgb;

use abundance_viewer::color::{fit_line_color, group_color};
use abundance_viewer::data::model::Provenance;

use crate::state::AppState;

fn color32(c: Srgb<u8>) -> Color32 {
    Color32::from_rgb(c.red, c.green, c.blue)
}

// ---------------------------------------------------------------------------
// Relationship plot (central panel)
// ---------------------------------------------------------------------------

/// Render the selected relationship: one scatter per point group and the
/// fitted line.
pub fn relationship_plot(ui: &mut Ui, state: &AppState) {
    if state.working.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a star table to begin  (File → Open…)");
        });
        return;
    }

    let Some((rel, result)) = state.selected_analysis() else {
        return;
    };

    let analysis = match result {
        Ok(a) => a,
        Err(e) => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading(format!("{}: {e}", rel.short_name()));
            });
            return;
        }
    };

    ui.vertical_centered(|ui: &mut Ui| {
        ui.strong(rel.title);
    });

    Plot::new(rel.file_name)
        .legend(egui_plot::Legend::default())
        .x_axis_label(rel.x_label)
        .y_axis_label(rel.y_label)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for group in &analysis.groups {
                let points: PlotPoints = group.series.points().map(|(x, y)| [x, y]).collect();
                let shape = if group.provenance == Some(Provenance::Internal) {
                    MarkerShape::Square
                } else {
                    MarkerShape::Circle
                };
                plot_ui.points(
                    Points::new(points)
                        .name(group.label())
                        .color(color32(group_color(group.provenance)))
                        .shape(shape)
                        .filled(true)
                        .radius(3.5),
                );
            }

            let line: PlotPoints = analysis
                .fit_line()
                .into_iter()
                .map(|(x, y)| [x, y])
                .collect();
            plot_ui.line(
                Line::new(line)
                    .name("Line Fit")
                    .color(color32(fit_line_color()))
                    .width(2.0),
            );
        });
}
