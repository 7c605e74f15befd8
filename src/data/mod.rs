/// Data layer: tables, catalog typing, and the selection core.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────────┐
///   │ source/loader │  TableSource fallback chain → Table
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  model    │  coerce-or-zero → Catalog of PumpRecord
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐     ┌──────────┐
///   │  filter   │ ──▶ │  rank     │  score, sort, top-% limit
///   └──────────┘     └──────────┘
///
///   derive: site inputs → suggested (flow, head)
///   curve:  curve Table → per-model points + operating point
/// ```

pub mod curve;
pub mod derive;
pub mod filter;
pub mod loader;
pub mod model;
pub mod rank;
pub mod source;

#[cfg(test)]
pub(crate) mod fixtures;
