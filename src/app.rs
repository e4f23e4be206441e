use eframe::egui;

use crate::state::AppState;
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct AbundanceApp {
    pub state: AppState,
}

impl AbundanceApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for AbundanceApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: relationships and fit summary ----
        egui::SidePanel::left("relationship_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Bottom panel: working-set records ----
        if self.state.show_table {
            egui::TopBottomPanel::bottom("records_panel")
                .resizable(true)
                .default_height(220.0)
                .show(ctx, |ui| {
                    table::records_table(ui, &self.state);
                });
        }

        // ---- Central panel: scatter + fit ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::relationship_plot(ui, &self.state);
        });
    }
}
