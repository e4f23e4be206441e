use crate::data::filter::{extract_pair, PairSeries};
use crate::data::model::{Provenance, Slot};
use crate::data::pipeline::WorkingSet;
use crate::fit::{FitError, LinearFit};

// ---------------------------------------------------------------------------
// Relationship descriptors
// ---------------------------------------------------------------------------

/// One plotted pairwise relationship: which slots go on which axis, and how
/// the chart is labelled and named.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Relationship {
    pub x: Slot,
    pub y: Slot,
    pub x_label: &'static str,
    pub y_label: &'static str,
    pub title: &'static str,
    pub file_name: &'static str,
}

const BA_LABEL: &str = "Barium Abundances (Ba/Fe)";
const EU_LABEL: &str = "Europium Abundances (Eu/Fe)";
const LA_LABEL: &str = "Lanthanum Abundances (La/Fe)";
const FE_LABEL: &str = "Metallicity (Fe/H)";

/// The six relationships charted for the red giant field star sample.
pub const RELATIONSHIPS: [Relationship; 6] = [
    Relationship {
        x: Slot::Barium,
        y: Slot::Europium,
        x_label: BA_LABEL,
        y_label: EU_LABEL,
        title: "Europium v Barium Abundances of Red Giant Field Stars",
        file_name: "Ba_v_Eu.png",
    },
    Relationship {
        x: Slot::Barium,
        y: Slot::Lanthanum,
        x_label: BA_LABEL,
        y_label: LA_LABEL,
        title: "Barium v Lanthanum Abundances of Red Giant Field Stars",
        file_name: "Ba_v_La.png",
    },
    Relationship {
        x: Slot::Europium,
        y: Slot::Lanthanum,
        x_label: EU_LABEL,
        y_label: LA_LABEL,
        title: "Europium v Lanthanum Abundances of Red Giant Field Stars",
        file_name: "Eu_v_La.png",
    },
    Relationship {
        x: Slot::Metallicity,
        y: Slot::Barium,
        x_label: FE_LABEL,
        y_label: BA_LABEL,
        title: "Barium Abundances v Metallicity of Red Giant Field Stars",
        file_name: "Ba_v_Metal.png",
    },
    Relationship {
        x: Slot::Metallicity,
        y: Slot::Europium,
        x_label: FE_LABEL,
        y_label: EU_LABEL,
        title: "Europium Abundances v Metallicity of Red Giant Field Stars",
        file_name: "Eu_v_Metal.png",
    },
    Relationship {
        x: Slot::Metallicity,
        y: Slot::Lanthanum,
        x_label: FE_LABEL,
        y_label: LA_LABEL,
        title: "Lanthanum Abundances v Metallicity of Red Giant Field Stars",
        file_name: "La_v_Metal.png",
    },
];

impl Relationship {
    /// Short name such as `Ba v Eu`.
    pub fn short_name(&self) -> String {
        format!("{} v {}", self.x, self.y)
    }
}

// ---------------------------------------------------------------------------
// Analysis result
// ---------------------------------------------------------------------------

/// A labelled scatter group. `provenance` is `None` for the ungrouped view.
#[derive(Debug, Clone, PartialEq)]
pub struct PointGroup {
    pub provenance: Option<Provenance>,
    pub series: PairSeries,
}

impl PointGroup {
    pub fn label(&self) -> &'static str {
        self.provenance
            .map(Provenance::label)
            .unwrap_or("All Data Points")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RelationshipAnalysis {
    pub relationship: Relationship,
    /// Scatter groups, one per provenance that has points (or a single
    /// group when grouping is off).
    pub groups: Vec<PointGroup>,
    /// Every qualifying star regardless of provenance; the fit input.
    pub combined: PairSeries,
    pub fit: LinearFit,
    /// `fit` evaluated at each `combined.x`, same order.
    pub fitted: Vec<f64>,
}

impl RelationshipAnalysis {
    /// Fitted line as points sorted by x, ready to draw as a polyline.
    pub fn fit_line(&self) -> Vec<(f64, f64)> {
        let mut line: Vec<(f64, f64)> = self
            .combined
            .x
            .iter()
            .copied()
            .zip(self.fitted.iter().copied())
            .collect();
        line.sort_by(|a, b| a.0.total_cmp(&b.0));
        line
    }

    /// Bounding box of all plotted points: `(x_min, x_max, y_min, y_max)`.
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        let fold = |vals: &[f64]| {
            vals.iter()
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                    (lo.min(v), hi.max(v))
                })
        };
        let (x_min, x_max) = fold(&self.combined.x);
        let (y_lo, y_hi) = fold(&self.combined.y);
        let (f_lo, f_hi) = fold(&self.fitted);
        (x_min, x_max, y_lo.min(f_lo), y_hi.max(f_hi))
    }
}

/// Extract, fit and group one relationship.
pub fn analyze(
    working: &WorkingSet,
    relationship: &Relationship,
    provenance_groups: bool,
) -> Result<RelationshipAnalysis, FitError> {
    let stars = working.stars();
    let combined = extract_pair(stars, relationship.x, relationship.y, None);
    let fit = LinearFit::fit(&combined.x, &combined.y)?;
    let fitted = fit.fitted(&combined.x);

    let groups = if provenance_groups {
        Provenance::ALL
            .into_iter()
            .map(|p| PointGroup {
                provenance: Some(p),
                series: extract_pair(stars, relationship.x, relationship.y, Some(p)),
            })
            .filter(|g| !g.series.is_empty())
            .collect()
    } else {
        vec![PointGroup {
            provenance: None,
            series: combined.clone(),
        }]
    };

    Ok(RelationshipAnalysis {
        relationship: *relationship,
        groups,
        combined,
        fit,
        fitted,
    })
}

/// Analyze every relationship independently; a failing one does not stop
/// the rest.
pub fn analyze_all(
    working: &WorkingSet,
    provenance_groups: bool,
) -> Vec<(Relationship, Result<RelationshipAnalysis, FitError>)> {
    RELATIONSHIPS
        .iter()
        .map(|rel| {
            let result = analyze(working, rel, provenance_groups);
            if let Err(err) = &result {
                log::warn!("{}: {err}", rel.short_name());
            }
            (*rel, result)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{StarRecord, UnitKind};
    use crate::data::normalize::SolarReference;
    use crate::data::pipeline::prepare;

    fn ratio_star(prov: Provenance, ba: Option<f64>, eu: Option<f64>, fe: f64) -> StarRecord {
        StarRecord {
            id: format!("{prov}-{fe}"),
            provenance: prov,
            unit_kind: UnitKind::AlreadyRatio,
            barium: ba,
            europium: eu,
            lanthanum: None,
            metallicity: Some(fe),
        }
    }

    fn working() -> WorkingSet {
        prepare(
            vec![
                ratio_star(Provenance::Internal, Some(0.1), Some(0.2), -1.0),
                ratio_star(Provenance::Literature, Some(0.3), Some(0.6), -2.0),
                ratio_star(Provenance::Literature, Some(0.5), None, -1.5),
            ],
            &SolarReference::default(),
        )
    }

    #[test]
    fn descriptors_cover_every_pairing_once() {
        let names: Vec<_> = RELATIONSHIPS.iter().map(|r| r.file_name).collect();
        assert_eq!(
            names,
            [
                "Ba_v_Eu.png",
                "Ba_v_La.png",
                "Eu_v_La.png",
                "Ba_v_Metal.png",
                "Eu_v_Metal.png",
                "La_v_Metal.png"
            ]
        );
        for rel in RELATIONSHIPS.iter().filter(|r| r.file_name.ends_with("Metal.png")) {
            assert_eq!(rel.x, Slot::Metallicity);
            assert!(rel.y.is_element());
        }
    }

    #[test]
    fn groups_split_by_provenance() {
        let ws = working();
        let a = analyze(&ws, &RELATIONSHIPS[3], true).unwrap();
        assert_eq!(a.combined.len(), 3);
        assert_eq!(a.groups.len(), 2);
        assert_eq!(a.groups[0].provenance, Some(Provenance::Internal));
        assert_eq!(a.groups[0].series.len(), 1);
        assert_eq!(a.groups[1].label(), "Literature Data Points");
        assert_eq!(a.groups[1].series.len(), 2);
        assert_eq!(a.fitted.len(), a.combined.len());
    }

    #[test]
    fn ungrouped_view_has_single_group() {
        let ws = working();
        let a = analyze(&ws, &RELATIONSHIPS[0], false).unwrap();
        assert_eq!(a.groups.len(), 1);
        assert_eq!(a.groups[0].label(), "All Data Points");
        assert_eq!(a.groups[0].series, a.combined);
    }

    #[test]
    fn empty_relationship_does_not_abort_others() {
        let ws = working();
        let results = analyze_all(&ws, true);
        assert_eq!(results.len(), 6);
        for (rel, result) in &results {
            if rel.x == Slot::Lanthanum || rel.y == Slot::Lanthanum {
                assert_eq!(result.as_ref().unwrap_err(), &FitError::InsufficientData);
            } else {
                assert!(result.is_ok(), "{} should fit", rel.short_name());
            }
        }
    }

    #[test]
    fn fit_line_is_sorted_by_x() {
        let ws = working();
        let a = analyze(&ws, &RELATIONSHIPS[3], true).unwrap();
        let line = a.fit_line();
        assert!(line.windows(2).all(|w| w[0].0 <= w[1].0));
        assert_eq!(line.first().unwrap().0, -2.0);
    }
}
