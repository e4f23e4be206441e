use super::model::{Provenance, Slot, StarRecord};

// ---------------------------------------------------------------------------
// Completeness filter: metallicity is a mandatory key
// ---------------------------------------------------------------------------

/// Result of the completeness pass.
#[derive(Debug, Clone, Default)]
pub struct Completeness {
    /// Records carrying a metallicity, in input order.
    pub retained: Vec<StarRecord>,
    /// Identifiers of records dropped for lacking a metallicity.
    pub dropped: Vec<String>,
}

/// Split records into those with and without a metallicity value.
///
/// Single pass over the whole input; consecutive incomplete records are all
/// removed and the retained order is preserved.
pub fn retain_complete(records: Vec<StarRecord>) -> Completeness {
    let mut out = Completeness {
        retained: Vec::with_capacity(records.len()),
        dropped: Vec::new(),
    };
    for rec in records {
        if rec.metallicity.is_some() {
            out.retained.push(rec);
        } else {
            out.dropped.push(rec.id);
        }
    }
    if !out.dropped.is_empty() {
        log::info!(
            "dropped {} stars without metallicity: {:?}",
            out.dropped.len(),
            out.dropped
        );
    }
    out
}

// ---------------------------------------------------------------------------
// Pair extractor
// ---------------------------------------------------------------------------

/// Two index-aligned series: `x[i]` and `y[i]` come from the same star.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PairSeries {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl PairSeries {
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Iterate `(x, y)` points in extraction order.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.x.iter().copied().zip(self.y.iter().copied())
    }
}

/// Collect `(a, b)` from every record where both slots are present and,
/// when `provenance` is given, the record's provenance matches.
///
/// An empty result is valid; fitting it is the caller's concern.
pub fn extract_pair(
    records: &[StarRecord],
    a: Slot,
    b: Slot,
    provenance: Option<Provenance>,
) -> PairSeries {
    let mut series = PairSeries::default();
    for rec in records {
        if provenance.is_some_and(|p| p != rec.provenance) {
            continue;
        }
        if let (Some(va), Some(vb)) = (rec.get(a), rec.get(b)) {
            series.x.push(va);
            series.y.push(vb);
        }
    }
    series
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::UnitKind;

    fn star(id: &str, prov: Provenance, ba: Option<f64>, eu: Option<f64>, fe: Option<f64>) -> StarRecord {
        StarRecord {
            id: id.into(),
            provenance: prov,
            unit_kind: UnitKind::AlreadyRatio,
            barium: ba,
            europium: eu,
            lanthanum: None,
            metallicity: fe,
        }
    }

    #[test]
    fn consecutive_incomplete_records_are_all_dropped() {
        let recs = vec![
            star("a", Provenance::Internal, Some(0.1), None, None),
            star("b", Provenance::Internal, Some(0.2), None, None),
            star("c", Provenance::Internal, Some(0.3), None, Some(-1.0)),
            star("d", Provenance::Internal, Some(0.4), None, None),
        ];
        let out = retain_complete(recs);
        assert_eq!(out.retained.len(), 1);
        assert_eq!(out.retained[0].id, "c");
        assert_eq!(out.dropped, vec!["a", "b", "d"]);
    }

    #[test]
    fn retained_order_is_preserved() {
        let recs = vec![
            star("a", Provenance::Internal, None, None, Some(-1.0)),
            star("b", Provenance::Internal, None, None, None),
            star("c", Provenance::Literature, None, None, Some(-2.0)),
        ];
        let ids: Vec<_> = retain_complete(recs)
            .retained
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn extract_skips_records_missing_either_slot() {
        let recs = vec![
            star("a", Provenance::Internal, Some(0.1), Some(0.5), Some(-1.0)),
            star("b", Provenance::Internal, Some(0.2), None, Some(-1.1)),
            star("c", Provenance::Literature, None, Some(0.7), Some(-1.2)),
            star("d", Provenance::Literature, Some(0.4), Some(0.8), Some(-1.3)),
        ];
        let s = extract_pair(&recs, Slot::Barium, Slot::Europium, None);
        assert_eq!(s.x, vec![0.1, 0.4]);
        assert_eq!(s.y, vec![0.5, 0.8]);
    }

    #[test]
    fn extract_honours_provenance_filter() {
        let recs = vec![
            star("a", Provenance::Internal, Some(0.1), None, Some(-1.0)),
            star("b", Provenance::Literature, Some(0.2), None, Some(-1.1)),
            star("c", Provenance::Unspecified, Some(0.3), None, Some(-1.2)),
        ];
        let lit = extract_pair(&recs, Slot::Metallicity, Slot::Barium, Some(Provenance::Literature));
        assert_eq!(lit.points().collect::<Vec<_>>(), vec![(-1.1, 0.2)]);

        let all = extract_pair(&recs, Slot::Metallicity, Slot::Barium, None);
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn all_absent_slot_yields_empty_series() {
        let recs = vec![
            star("a", Provenance::Internal, None, Some(0.5), Some(-1.0)),
            star("b", Provenance::Literature, None, Some(0.6), Some(-1.1)),
        ];
        let s = extract_pair(&recs, Slot::Barium, Slot::Europium, None);
        assert!(s.is_empty());
        assert!(s.y.is_empty());
    }

    #[test]
    fn extraction_is_repeatable() {
        let recs = vec![
            star("a", Provenance::Internal, Some(0.1), Some(0.5), Some(-1.0)),
            star("b", Provenance::Literature, Some(0.2), Some(0.6), Some(-1.1)),
        ];
        let first = extract_pair(&recs, Slot::Barium, Slot::Europium, None);
        let second = extract_pair(&recs, Slot::Barium, Slot::Europium, None);
        assert_eq!(first, second);
    }
}
