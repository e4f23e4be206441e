use eframe::egui::{self, Ui};
use egui_extras::{Column, TableBuilder};

use crate::state::AppState;

const HEADERS: [&str; 6] = ["Star", "Source", "[Ba/Fe]", "[Eu/Fe]", "[La/Fe]", "[Fe/H]"];

fn cell(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.3}")).unwrap_or_else(|| "–".to_string())
}

/// Table of the working set, after normalization and filtering.
pub fn records_table(ui: &mut Ui, state: &AppState) {
    let Some(ws) = &state.working else {
        ui.label("No dataset loaded.");
        return;
    };
    let stars = ws.stars();

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .column(Column::auto().at_least(100.0))
        .column(Column::auto().at_least(80.0))
        .columns(Column::auto().at_least(70.0), 4)
        .header(20.0, |mut header| {
            for title in HEADERS {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, stars.len(), |mut row| {
                let star = &stars[row.index()];
                row.col(|ui| {
                    ui.label(&star.id);
                });
                row.col(|ui| {
                    ui.label(star.provenance.to_string());
                });
                for value in [star.barium, star.europium, star.lanthanum, star.metallicity] {
                    row.col(|ui| {
                        ui.label(cell(value));
                    });
                }
            });
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_values_render_as_dash() {
        assert_eq!(cell(None), "–");
        assert_eq!(cell(Some(-0.12345)), "-0.123");
    }
}
