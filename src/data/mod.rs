/// Data layer: curve types, loading, ordering and selection.
///
/// Architecture:
/// ```text
///  .parquet / .json / .csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → LoadedCurves (CurveSet + labels)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ ordering  │  key → display order, display strings
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ selection │  selected indices → kept / removed keys
///   └───────────┘
/// ```

pub mod loader;
pub mod model;
pub mod ordering;
pub mod selection;
