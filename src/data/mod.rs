/// Data layer: star records, loading, normalization and filtering.
///
/// Architecture:
/// ```text
///  .txt / .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Vec<StarRecord>   ('x' sentinel → None)
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ normalize  │  logE → [X/Fe], once per record
///   └───────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  drop stars without [Fe/H] → WorkingSet
///   └──────────┘
///        │
///        ▼
///   extract_pair(slot_a, slot_b, provenance?) → PairSeries
/// ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod normalize;
pub mod pipeline;
