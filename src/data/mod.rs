/// Data layer: core types, loading, filtering and chart aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse + clean rows → Dataset
///   └──────────┘
///        │
///        ├──────────────► catalog    distinct genres / ratings / years
///        ▼
///   ┌──────────┐
///   │  filter   │  FilterSelection → matching records (or NoSelection)
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  scatter points, genre-by-platform stack
///   └───────────┘
/// ```

pub mod aggregate;
pub mod catalog;
pub mod filter;
pub mod loader;
pub mod model;
