use super::filter::{retain_complete, Completeness};
use super::model::StarRecord;
use super::normalize::{normalize_units, SolarReference};

// ---------------------------------------------------------------------------
// WorkingSet – normalized, complete records ready for extraction
// ---------------------------------------------------------------------------

/// Immutable snapshot of the stars that survived normalization and filtering.
#[derive(Debug, Clone, Default)]
pub struct WorkingSet {
    stars: Vec<StarRecord>,
    dropped: Vec<String>,
    converted: usize,
}

impl WorkingSet {
    pub fn stars(&self) -> &[StarRecord] {
        &self.stars
    }

    /// Identifiers of stars removed for lacking a metallicity.
    pub fn dropped(&self) -> &[String] {
        &self.dropped
    }

    /// Number of logE records converted to [X/Fe].
    pub fn converted(&self) -> usize {
        self.converted
    }

    pub fn len(&self) -> usize {
        self.stars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }
}

/// Normalize units exactly once, then drop stars without metallicity.
pub fn prepare(mut records: Vec<StarRecord>, solar: &SolarReference) -> WorkingSet {
    let converted = normalize_units(&mut records, solar);
    let Completeness { retained, dropped } = retain_complete(records);
    log::info!(
        "working set: {} stars ({} converted from logE, {} dropped)",
        retained.len(),
        converted,
        dropped.len()
    );
    WorkingSet {
        stars: retained,
        dropped,
        converted,
    }
}
