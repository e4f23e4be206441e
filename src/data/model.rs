use std::fmt;

// ---------------------------------------------------------------------------
// Provenance – where a star's measurements come from
// ---------------------------------------------------------------------------

/// Origin of a star's abundances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Provenance {
    /// Analysed in-house (MOOG spectral synthesis). Tagged `I`.
    Internal,
    /// Collected from published papers. Tagged `E`.
    Literature,
    /// Any other tag.
    Unspecified,
}

impl Provenance {
    pub const ALL: [Provenance; 3] = [
        Provenance::Internal,
        Provenance::Literature,
        Provenance::Unspecified,
    ];

    pub fn from_tag(tag: &str) -> Self {
        match tag.trim() {
            "I" => Provenance::Internal,
            "E" => Provenance::Literature,
            _ => Provenance::Unspecified,
        }
    }

    /// Legend label used by both chart emitters.
    pub fn label(self) -> &'static str {
        match self {
            Provenance::Internal => "Individual Data Points",
            Provenance::Literature => "Literature Data Points",
            Provenance::Unspecified => "Unattributed Data Points",
        }
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provenance::Internal => write!(f, "internal"),
            Provenance::Literature => write!(f, "literature"),
            Provenance::Unspecified => write!(f, "unspecified"),
        }
    }
}

// ---------------------------------------------------------------------------
// UnitKind – how the elemental columns are expressed
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitKind {
    /// Already an element-to-iron ratio ([X/Fe]).
    AlreadyRatio,
    /// log ε abundance, needs conversion to [X/Fe].
    LogAbundance,
}

impl UnitKind {
    pub const LOG_TAG: &'static str = "logE";

    pub fn from_tag(tag: &str) -> Self {
        if tag.trim() == Self::LOG_TAG {
            UnitKind::LogAbundance
        } else {
            UnitKind::AlreadyRatio
        }
    }
}

// ---------------------------------------------------------------------------
// Slot – a selectable numeric attribute of a record
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Barium,
    Europium,
    Lanthanum,
    Metallicity,
}

impl Slot {
    /// The three elemental slots, in table column order.
    pub const ELEMENTS: [Slot; 3] = [Slot::Barium, Slot::Europium, Slot::Lanthanum];

    pub fn symbol(self) -> &'static str {
        match self {
            Slot::Barium => "Ba",
            Slot::Europium => "Eu",
            Slot::Lanthanum => "La",
            Slot::Metallicity => "Fe/H",
        }
    }

    pub fn is_element(self) -> bool {
        !matches!(self, Slot::Metallicity)
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

// ---------------------------------------------------------------------------
// StarRecord – one row of the star table
// ---------------------------------------------------------------------------

/// A single star (one row of the source table).
#[derive(Debug, Clone, PartialEq)]
pub struct StarRecord {
    /// Star identifier as written in the table.
    pub id: String,
    pub provenance: Provenance,
    pub unit_kind: UnitKind,
    pub barium: Option<f64>,
    pub europium: Option<f64>,
    pub lanthanum: Option<f64>,
    /// [Fe/H]. Mandatory for analysis; records without it are dropped.
    pub metallicity: Option<f64>,
}

impl StarRecord {
    pub fn get(&self, slot: Slot) -> Option<f64> {
        match slot {
            Slot::Barium => self.barium,
            Slot::Europium => self.europium,
            Slot::Lanthanum => self.lanthanum,
            Slot::Metallicity => self.metallicity,
        }
    }

    pub fn slot_mut(&mut self, slot: Slot) -> &mut Option<f64> {
        match slot {
            Slot::Barium => &mut self.barium,
            Slot::Europium => &mut self.europium,
            Slot::Lanthanum => &mut self.lanthanum,
            Slot::Metallicity => &mut self.metallicity,
        }
    }
}
