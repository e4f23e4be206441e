use serde::{Deserialize, Serialize};

use super::model::{Slot, StarRecord, UnitKind};

/// Offset between log ε and the hydrogen-relative scale.
pub const LOG_EPSILON_ZERO_POINT: f64 = 12.0;

// ---------------------------------------------------------------------------
// Solar reference constants
// ---------------------------------------------------------------------------

/// Per-element solar reference values subtracted during conversion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolarReference {
    #[serde(default = "SolarReference::default_barium")]
    pub barium: f64,
    #[serde(default = "SolarReference::default_europium")]
    pub europium: f64,
    #[serde(default = "SolarReference::default_lanthanum")]
    pub lanthanum: f64,
}

impl SolarReference {
    fn default_barium() -> f64 {
        -9.87
    }
    fn default_europium() -> f64 {
        -11.82
    }
    fn default_lanthanum() -> f64 {
        -10.73
    }

    /// Reference constant for an elemental slot; `None` for metallicity.
    pub fn for_slot(&self, slot: Slot) -> Option<f64> {
        match slot {
            Slot::Barium => Some(self.barium),
            Slot::Europium => Some(self.europium),
            Slot::Lanthanum => Some(self.lanthanum),
            Slot::Metallicity => None,
        }
    }
}

impl Default for SolarReference {
    fn default() -> Self {
        Self {
            barium: Self::default_barium(),
            europium: Self::default_europium(),
            lanthanum: Self::default_lanthanum(),
        }
    }
}

// ---------------------------------------------------------------------------
// Unit normalizer
// ---------------------------------------------------------------------------

/// Convert log ε abundances to [X/Fe] in place.
///
/// Only `LogAbundance` records carrying a metallicity are touched; each present
/// element becomes `value - 12 - [Fe/H] - solar`. Converted records are
/// re-tagged `AlreadyRatio`, so running this twice leaves values alone.
///
/// Returns the number of converted records.
pub fn normalize_units(records: &mut [StarRecord], solar: &SolarReference) -> usize {
    let mut converted = 0;
    for rec in records.iter_mut() {
        if rec.unit_kind != UnitKind::LogAbundance {
            continue;
        }
        let Some(fe_h) = rec.metallicity else {
            continue;
        };
        for slot in Slot::ELEMENTS {
            let Some(reference) = solar.for_slot(slot) else {
                continue;
            };
            if let Some(value) = rec.slot_mut(slot) {
                *value = *value - LOG_EPSILON_ZERO_POINT - fe_h - reference;
            }
        }
        rec.unit_kind = UnitKind::AlreadyRatio;
        converted += 1;
    }
    log::debug!("converted {converted} logE records to [X/Fe]");
    converted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Provenance;

    fn log_star(ba: Option<f64>, eu: Option<f64>, la: Option<f64>, fe: Option<f64>) -> StarRecord {
        StarRecord {
            id: "star".into(),
            provenance: Provenance::Internal,
            unit_kind: UnitKind::LogAbundance,
            barium: ba,
            europium: eu,
            lanthanum: la,
            metallicity: fe,
        }
    }

    #[test]
    fn converts_each_present_element() {
        let solar = SolarReference::default();
        let mut recs = vec![log_star(Some(9.0), Some(11.5), Some(10.2), Some(-0.5))];
        assert_eq!(normalize_units(&mut recs, &solar), 1);

        let r = &recs[0];
        assert_eq!(r.barium, Some(9.0 - 12.0 - -0.5 - -9.87));
        assert_eq!(r.europium, Some(11.5 - 12.0 - -0.5 - -11.82));
        assert_eq!(r.lanthanum, Some(10.2 - 12.0 - -0.5 - -10.73));
        assert_eq!(r.metallicity, Some(-0.5));
        assert_eq!(r.unit_kind, UnitKind::AlreadyRatio);
    }

    #[test]
    fn missing_elements_stay_missing() {
        let mut recs = vec![log_star(None, Some(11.0), None, Some(-1.0))];
        normalize_units(&mut recs, &SolarReference::default());
        assert_eq!(recs[0].barium, None);
        assert_eq!(recs[0].lanthanum, None);
        assert!(recs[0].europium.is_some());
    }

    #[test]
    fn missing_metallicity_leaves_record_unconverted() {
        let original = log_star(Some(9.0), Some(11.5), Some(10.2), None);
        let mut recs = vec![original.clone()];
        assert_eq!(normalize_units(&mut recs, &SolarReference::default()), 0);
        assert_eq!(recs[0], original);
    }

    #[test]
    fn second_application_is_a_no_op() {
        let solar = SolarReference::default();
        let mut recs = vec![log_star(Some(9.0), None, None, Some(-0.5))];
        normalize_units(&mut recs, &solar);
        let once = recs.clone();
        assert_eq!(normalize_units(&mut recs, &solar), 0);
        assert_eq!(recs, once);
    }

    #[test]
    fn custom_europium_reference_is_used() {
        let solar = SolarReference {
            europium: -13.82,
            ..SolarReference::default()
        };
        let mut recs = vec![log_star(None, Some(11.5), None, Some(0.0))];
        normalize_units(&mut recs, &solar);
        assert_eq!(recs[0].europium, Some(11.5 - 12.0 - 0.0 - -13.82));
    }
}
