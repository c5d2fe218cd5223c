/// Data layer: core types, loading, filtering, joining and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .tsv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Vec<Movie>, Vec<Genre>
///   └──────────┘
///        │
///        ├──────────────┐
///        ▼              ▼
///   ┌──────────┐   ┌──────────┐
///   │  filter   │   │   join    │  genre_id → genre name (inner join)
///   └──────────┘   └──────────┘
///   top rated,          │
///   year range          ▼
///        │         ┌───────────┐
///        └───────▶ │ aggregate  │  per-year means, per-genre runtime/count
///                  └───────────┘
/// ```

pub mod aggregate;
pub mod filter;
pub mod join;
pub mod loader;
pub mod model;
