use std::path::Path;

use anyhow::Result;

use crate::analysis::{analyze_all, Relationship, RelationshipAnalysis};
use crate::chart::{render_all, RenderOutcome};
use crate::config::AnalysisConfig;
use crate::data::loader::load_file;
use crate::data::pipeline::{prepare, WorkingSet};
use crate::fit::FitError;

pub type AnalysisResults = Vec<(Relationship, Result<RelationshipAnalysis, FitError>)>;

/// Load, normalize, filter and fit. Ingestion failures are fatal; fit
/// failures stay attached to their relationship.
pub fn analyze_file(input: &Path, config: &AnalysisConfig) -> Result<(WorkingSet, AnalysisResults)> {
    let records = load_file(input, &config.ingest_options())?;
    let working = prepare(records, &config.solar);
    let results = analyze_all(&working, config.provenance_groups);
    Ok((working, results))
}

/// Headless run: analyze `input` and write every chart to the configured
/// output directory.
pub fn run(input: &Path, config: &AnalysisConfig) -> Result<Vec<RenderOutcome>> {
    let (_, results) = analyze_file(input, config).inspect_err(|e| {
        log::error!("Failed to load {}: {e:#}", input.display());
    })?;
    let outcomes = render_all(&results, &config.output_dir, config.image_size())?;

    let written = outcomes
        .iter()
        .filter(|o| matches!(o, RenderOutcome::Written(_)))
        .count();
    log::info!(
        "{written} of {} charts written to {}",
        outcomes.len(),
        config.output_dir.display()
    );
    Ok(outcomes)
}
