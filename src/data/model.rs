use std::fmt;

use chrono::{Datelike, NaiveDate};

// ---------------------------------------------------------------------------
// Value – a single decoded cell, before it is given a column type
// ---------------------------------------------------------------------------

/// A dynamically-typed cell as produced by the format readers.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Date(NaiveDate),
    Null,
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{s}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Date(d) => write!(f, "{d}"),
            Value::Null => write!(f, "<null>"),
        }
    }
}

impl Value {
    /// Interpret the value as an `f64`. Strings are parsed, empty strings are `None`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            Value::Integer(i) => Some(*i as f64),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Interpret the value as an identifier.
    ///
    /// Integral floats (`18.0`) are accepted: nullable integer columns come
    /// back float-encoded from most dataframe writers.
    pub fn as_id(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            Value::Float(v) if v.fract() == 0.0 && v.is_finite() => Some(*v as i64),
            Value::String(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| Value::Float(s.parse().ok()?).as_id())
            }
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<String> {
        match self {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Movie / Genre – one row of the source tables
// ---------------------------------------------------------------------------

/// A single movie (one row of the movies table).
#[derive(Debug, Clone, PartialEq)]
pub struct Movie {
    pub id: i64,
    pub title: String,
    /// `None` when the source cell was empty.
    pub release_date: Option<NaiveDate>,
    /// `None` when the source cell was empty.
    pub vote_count: Option<u64>,
    /// NaN when the source cell was empty.
    pub vote_average: f64,
    pub revenue: Option<f64>,
    pub budget: Option<f64>,
    /// Minutes.
    pub runtime: Option<f64>,
    pub genre_id: Option<i64>,
}

impl Movie {
    pub fn release_year(&self) -> Option<i32> {
        self.release_date.map(|d| d.year())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Genre {
    pub id: i64,
    pub name: String,
}

/// A movie with its genre name attached by [`crate::data::join::join_genres`].
#[derive(Debug, Clone, PartialEq)]
pub struct JoinedMovie {
    pub movie: Movie,
    pub genre: String,
}

/// One row of the top-rated list.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedMovie {
    /// Position in the ranked list, starting at 0.
    pub rank: usize,
    /// Position of the record in the table it was ranked from.
    pub source_row: usize,
    pub movie: Movie,
}

// ---------------------------------------------------------------------------
// Aggregated rows
// ---------------------------------------------------------------------------

/// Mean revenue and budget of the movies released in one year.
#[derive(Debug, Clone, PartialEq)]
pub struct YearlyAggregate {
    pub release_year: i32,
    pub revenue: Option<f64>,
    pub budget: Option<f64>,
    /// Number of movies in the group.
    pub movies: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenreRuntime {
    pub genre: String,
    /// Mean runtime in minutes, `None` if no movie of the genre has one.
    pub runtime: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenreCount {
    pub genre: String,
    pub count: usize,
}

impl fmt::Display for GenreCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} movies)", self.genre, self.count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers_accept_integral_floats() {
        assert_eq!(Value::Integer(7).as_id(), Some(7));
        assert_eq!(Value::Float(18.0).as_id(), Some(18));
        assert_eq!(Value::String("18.0".into()).as_id(), Some(18));
        assert_eq!(Value::Float(1.5).as_id(), None);
        assert_eq!(Value::Null.as_id(), None);
    }

    #[test]
    fn release_year_follows_date() {
        let movie = Movie {
            id: 1,
            title: "Heat".into(),
            release_date: NaiveDate::from_ymd_opt(1995, 12, 15),
            vote_count: Some(10),
            vote_average: 7.9,
            revenue: None,
            budget: None,
            runtime: Some(170.0),
            genre_id: None,
        };
        assert_eq!(movie.release_year(), Some(1995));
        let undated = Movie {
            release_date: None,
            ..movie
        };
        assert_eq!(undated.release_year(), None);
    }
}
