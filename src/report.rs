//! The end-to-end analysis run: rank, aggregate per year, join genres and
//! summarise them, plus its console rendering.

use std::fmt;

use crate::chart::{histogram, millions, HistogramBin};
use crate::data::aggregate::{
    genre_mean_runtime, genre_runtimes, longest_runtime_genre, top_genre_by_count,
    yearly_aggregate,
};
use crate::data::filter::top_rated;
use crate::data::join::join_genres;
use crate::data::model::{
    Genre, GenreCount, GenreRuntime, JoinedMovie, Movie, RankedMovie, YearlyAggregate,
};
use crate::error::{or_empty, AggregateError};

/// Parameters of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub start_year: i32,
    pub end_year: i32,
    pub top_n: usize,
    /// Histogram bin count.
    pub bins: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            start_year: 2010,
            end_year: 2016,
            top_n: 10,
            bins: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenreSummary {
    /// Mean runtime per genre, ordered by genre name.
    pub runtime_by_genre: Vec<GenreRuntime>,
    pub top_genre: GenreCount,
    pub longest_runtime: String,
}

#[derive(Debug, Clone)]
pub struct Analysis {
    pub settings: Settings,
    pub top_rated: Vec<RankedMovie>,
    pub yearly: Vec<YearlyAggregate>,
    pub joined: Vec<JoinedMovie>,
    /// Fails with [`AggregateError::NoGroups`] when no movie has a known genre.
    pub genres: Result<GenreSummary, AggregateError>,
}

/// Run every step over the loaded tables.
///
/// An absent table is logged and treated as empty; genre summaries keep
/// their own hard failure in [`Analysis::genres`].
pub fn analyse(movies: Option<&[Movie]>, genres: Option<&[Genre]>, settings: Settings) -> Analysis {
    let movies = or_empty(movies, "movies");

    let top_rated = top_rated(movies, settings.top_n);
    let yearly = yearly_aggregate(movies, settings.start_year, settings.end_year);
    if yearly.is_empty() {
        log::warn!(
            "No movies released in {}-{}, the revenue/budget chart will be skipped",
            settings.start_year,
            settings.end_year
        );
    }

    let joined = join_genres(movies, or_empty(genres, "genres"));
    let genres = summarise_genres(&joined);

    Analysis {
        settings,
        top_rated,
        yearly,
        joined,
        genres,
    }
}

pub fn summarise_genres(joined: &[JoinedMovie]) -> Result<GenreSummary, AggregateError> {
    Ok(GenreSummary {
        runtime_by_genre: genre_mean_runtime(joined)?,
        top_genre: top_genre_by_count(joined)?,
        longest_runtime: longest_runtime_genre(joined)?,
    })
}

impl Analysis {
    /// Recompute the per-year aggregation for a new range.
    pub fn set_year_range(&mut self, movies: &[Movie], start_year: i32, end_year: i32) {
        self.settings.start_year = start_year;
        self.settings.end_year = end_year;
        self.yearly = yearly_aggregate(movies, start_year, end_year);
    }

    /// Runtime histogram of one genre.
    pub fn runtime_histogram(&self, genre: &str) -> Vec<HistogramBin> {
        histogram(&genre_runtimes(&self.joined, genre), self.settings.bins)
    }
}

fn money(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), millions)
}

impl fmt::Display for Analysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Settings {
            start_year,
            end_year,
            top_n,
            ..
        } = self.settings;

        writeln!(f, "Top {top_n} rated movies:")?;
        if self.top_rated.is_empty() {
            writeln!(f, "  (none)")?;
        }
        for ranked in &self.top_rated {
            writeln!(
                f,
                "  {:>2}. {} ({:.1}, {} votes)",
                ranked.rank + 1,
                ranked.movie.title,
                ranked.movie.vote_average,
                ranked.movie.vote_count.unwrap_or_default()
            )?;
        }

        writeln!(f)?;
        writeln!(f, "Average revenue and budget per year, {start_year}-{end_year}:")?;
        if self.yearly.is_empty() {
            writeln!(f, "  no movies in range, chart skipped")?;
        }
        for row in &self.yearly {
            writeln!(
                f,
                "  {}  revenue {:>9}  budget {:>9}  ({} movies)",
                row.release_year,
                money(row.revenue),
                money(row.budget),
                row.movies
            )?;
        }

        if let Ok(summary) = &self.genres {
            writeln!(f)?;
            writeln!(
                f,
                "The most common genre is {}, with {} movies.",
                summary.top_genre.genre, summary.top_genre.count
            )?;
            writeln!(
                f,
                "The genre with the longest average runtime is {}.",
                summary.longest_runtime
            )?;
        }
        Ok(())
    }
}
