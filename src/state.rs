use std::path::{Path, PathBuf};

use abundance_viewer::analysis::{analyze_all, Relationship, RelationshipAnalysis};
use abundance_viewer::batch::AnalysisResults;
use abundance_viewer::chart::{render_all, RenderOutcome};
use abundance_viewer::config::AnalysisConfig;
use abundance_viewer::data::loader::load_file;
use abundance_viewer::data::model::StarRecord;
use abundance_viewer::data::pipeline::{prepare, WorkingSet};
use abundance_viewer::fit::FitError;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: AnalysisConfig,

    /// File the working set came from.
    pub source: Option<PathBuf>,

    /// Normalized, complete stars (None until a file is loaded).
    pub working: Option<WorkingSet>,

    /// One entry per relationship, recomputed on load or option change.
    pub analyses: AnalysisResults,

    /// Index into `analyses` shown in the central panel.
    pub selected: usize,

    /// Whether the records table is visible.
    pub show_table: bool,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            config,
            source: None,
            working: None,
            analyses: Vec::new(),
            selected: 0,
            show_table: false,
            status_message: None,
        }
    }

    /// Load a star table; on failure keep the previous data and report.
    pub fn load(&mut self, path: &Path) {
        match load_file(path, &self.config.ingest_options()) {
            Ok(records) => {
                self.set_records(records);
                self.source = Some(path.to_path_buf());
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Ingest freshly loaded records: normalize once, filter, analyze.
    pub fn set_records(&mut self, records: Vec<StarRecord>) {
        self.working = Some(prepare(records, &self.config.solar));
        self.status_message = None;
        self.reanalyze();
    }

    pub fn reanalyze(&mut self) {
        self.analyses = match &self.working {
            Some(ws) => analyze_all(ws, self.config.provenance_groups),
            None => Vec::new(),
        };
        if self.selected >= self.analyses.len() {
            self.selected = 0;
        }
    }

    pub fn set_provenance_groups(&mut self, on: bool) {
        if self.config.provenance_groups != on {
            self.config.provenance_groups = on;
            self.reanalyze();
        }
    }

    pub fn selected_analysis(&self) -> Option<&(Relationship, Result<RelationshipAnalysis, FitError>)> {
        self.analyses.get(self.selected)
    }

    /// Write every fitted relationship to `dir` as PNG.
    pub fn export(&mut self, dir: &Path) {
        match render_all(&self.analyses, dir, self.config.image_size()) {
            Ok(outcomes) => {
                let written = outcomes
                    .iter()
                    .filter(|o| matches!(o, RenderOutcome::Written(_)))
                    .count();
                self.status_message = Some(format!(
                    "Exported {written} of {} charts to {}",
                    outcomes.len(),
                    dir.display()
                ));
            }
            Err(e) => {
                log::error!("Export failed: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

/// One-line fit summary for the side panel.
pub fn describe(result: &Result<RelationshipAnalysis, FitError>) -> String {
    match result {
        Ok(a) => format!(
            "slope {:.3}, intercept {:.3}, n = {}",
            a.fit.slope, a.fit.intercept, a.fit.n
        ),
        Err(e) => format!("no fit: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use abundance_viewer::data::model::{Provenance, UnitKind};

    fn star(id: &str, prov: Provenance, ba: f64, eu: f64, fe: Option<f64>) -> StarRecord {
        StarRecord {
            id: id.into(),
            provenance: prov,
            unit_kind: UnitKind::AlreadyRatio,
            barium: Some(ba),
            europium: Some(eu),
            lanthanum: None,
            metallicity: fe,
        }
    }

    fn loaded_state() -> AppState {
        let mut state = AppState::new(AnalysisConfig::default());
        state.set_records(vec![
            star("a", Provenance::Internal, 0.1, 0.2, Some(-1.0)),
            star("b", Provenance::Literature, 0.3, 0.5, Some(-2.0)),
            star("c", Provenance::Literature, 0.4, 0.9, None),
        ]);
        state
    }

    #[test]
    fn set_records_prepares_and_analyzes() {
        let state = loaded_state();
        let ws = state.working.as_ref().unwrap();
        assert_eq!(ws.len(), 2);
        assert_eq!(ws.dropped(), ["c".to_string()]);
        assert_eq!(state.analyses.len(), 6);

        let (rel, result) = state.selected_analysis().unwrap();
        assert_eq!(rel.file_name, "Ba_v_Eu.png");
        assert!(result.is_ok());
    }

    #[test]
    fn toggling_groups_reanalyzes() {
        let mut state = loaded_state();
        state.set_provenance_groups(false);
        let (_, result) = state.selected_analysis().unwrap();
        assert_eq!(result.as_ref().unwrap().groups.len(), 1);
    }

    #[test]
    fn describe_reports_fit_or_error() {
        let state = loaded_state();
        let text = describe(&state.analyses[0].1);
        assert!(text.starts_with("slope 1.500"), "{text}");
        assert!(text.ends_with("n = 2"));
        assert_eq!(
            describe(&Err(FitError::InsufficientData)),
            "no fit: no qualifying points to fit"
        );
    }

    #[test]
    fn failed_load_keeps_previous_data() {
        let mut state = loaded_state();
        state.load(Path::new("/nonexistent/stars.txt"));
        assert!(state.working.is_some());
        assert!(state.status_message.as_deref().unwrap().starts_with("Error:"));
    }
}
