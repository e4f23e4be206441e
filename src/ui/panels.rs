use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::state::{describe, AppState};

/// Extensions offered by the open dialog.
const SUPPORTED: [&str; 7] = ["txt", "dat", "tsv", "csv", "json", "parquet", "pq"];

// ---------------------------------------------------------------------------
// Left side panel – relationship selector and fit summary
// ---------------------------------------------------------------------------

/// Render the left panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Relationships");
    ui.separator();

    if state.working.is_none() {
        ui.label("No dataset loaded.");
        return;
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            let mut clicked = None;
            for (i, (rel, result)) in state.analyses.iter().enumerate() {
                let mut text = RichText::new(rel.short_name());
                if result.is_err() {
                    text = text.color(Color32::GRAY);
                }
                if ui.selectable_label(state.selected == i, text).clicked() {
                    clicked = Some(i);
                }
            }
            if let Some(i) = clicked {
                state.selected = i;
            }
            ui.separator();

            let mut grouped = state.config.provenance_groups;
            if ui.checkbox(&mut grouped, "Split by provenance").changed() {
                state.set_provenance_groups(grouped);
            }
            ui.checkbox(&mut state.show_table, "Show records");
            ui.separator();

            ui.strong("Fit");
            if let Some((_, result)) = state.selected_analysis() {
                ui.label(describe(result));
            }
            ui.separator();

            ui.strong("Solar reference");
            let solar = state.config.solar;
            ui.label(format!(
                "Ba {:.2}   Eu {:.2}   La {:.2}",
                solar.barium, solar.europium, solar.lanthanum
            ));
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            let can_export = !state.analyses.is_empty();
            if ui
                .add_enabled(can_export, egui::Button::new("Export charts…"))
                .clicked()
            {
                export_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(name) = state.source.as_deref().and_then(|p| p.file_name()) {
            ui.strong(name.to_string_lossy().into_owned());
        }

        if let Some(ws) = &state.working {
            ui.label(format!(
                "{} stars, {} converted from logE, {} dropped without [Fe/H]",
                ws.len(),
                ws.converted(),
                ws.dropped().len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            let color = if msg.starts_with("Error") {
                Color32::RED
            } else {
                Color32::GRAY
            };
            ui.label(RichText::new(msg).color(color));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open star table")
        .add_filter("Supported files", &SUPPORTED)
        .add_filter("Text table", &["txt", "dat", "tsv"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load(&path);
    }
}

pub fn export_dialog(state: &mut AppState) {
    let folder = rfd::FileDialog::new()
        .set_title("Export charts to folder")
        .set_directory(&state.config.output_dir)
        .pick_folder();

    if let Some(dir) = folder {
        state.export(&dir);
    }
}
