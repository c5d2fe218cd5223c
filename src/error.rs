use std::path::PathBuf;

use thiserror::Error;

/// Failures while reading a movies or genres file.
///
/// Only [`LoadError::FileNotFound`] and [`LoadError::EmptyData`] reach the
/// caller of the public loaders; every other variant is logged and the table
/// comes back absent (see [`crate::data::loader::load_movies`]).
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("no columns or rows to parse in {}", .0.display())]
    EmptyData(PathBuf),

    #[error("row {row}: cannot parse release_date {value:?}")]
    InvalidDate { row: usize, value: String },

    #[error("row {row}: missing or invalid '{column}'")]
    MissingColumn { row: usize, column: &'static str },

    #[error("cannot read {}: {message}", .path.display())]
    Unreadable { path: PathBuf, message: String },
}

impl LoadError {
    /// Whether the error aborts the caller instead of yielding an absent table.
    pub fn is_hard(&self) -> bool {
        matches!(self, LoadError::FileNotFound(_) | LoadError::EmptyData(_))
    }
}

/// Genre aggregations select a maximum and have nothing to select from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AggregateError {
    #[error("aggregation over zero groups")]
    NoGroups,
}

/// A table the rating/range path depends on was never loaded.
///
/// Never returned as an `Err`: it is logged and the table is treated as empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{0} table is missing, continuing with an empty table")]
pub struct MissingInput(pub &'static str);

/// Borrow `table`, or log [`MissingInput`] and fall back to an empty slice.
pub fn or_empty<'a, T>(table: Option<&'a [T]>, name: &'static str) -> &'a [T] {
    match table {
        Some(rows) => rows,
        None => {
            log::warn!("{}", MissingInput(name));
            &[]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_table_reads_as_empty() {
        let rows = [1, 2, 3];
        assert_eq!(or_empty(Some(&rows[..]), "movies"), &[1, 2, 3]);
        assert!(or_empty::<i32>(None, "movies").is_empty());
    }

    #[test]
    fn only_missing_and_empty_files_are_hard_failures() {
        assert!(LoadError::FileNotFound("a.csv".into()).is_hard());
        assert!(LoadError::EmptyData("a.csv".into()).is_hard());
        assert!(!LoadError::InvalidDate {
            row: 0,
            value: "soon".into()
        }
        .is_hard());
    }
}
