use std::path::Path;

use rusty_reels::chart::HistogramBin;
use rusty_reels::data::loader::{load_genres, load_movies};
use rusty_reels::data::model::{Genre, Movie};
use rusty_reels::report::{analyse, Analysis, Settings};

use crate::color::ColorMap;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Which chart the central panel shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    RevenueBudget,
    RuntimeHistogram,
    RuntimeByGenre,
    TopRated,
}

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded tables (None when the file could not be read).
    pub movies: Option<Vec<Movie>>,
    pub genres: Option<Vec<Genre>>,

    /// Results derived from the tables.
    pub analysis: Analysis,

    /// Year range being edited in the side panel.
    pub start_year: i32,
    pub end_year: i32,

    /// Genre shown in the runtime histogram.
    pub histogram_genre: Option<String>,

    /// Histogram of `histogram_genre` (cached).
    pub histogram: Vec<HistogramBin>,

    /// One colour per genre.
    pub color_map: ColorMap,

    pub view: View,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(movies: Option<Vec<Movie>>, genres: Option<Vec<Genre>>, analysis: Analysis) -> Self {
        let Settings {
            start_year,
            end_year,
            ..
        } = analysis.settings;
        let mut state = Self {
            movies,
            genres,
            analysis,
            start_year,
            end_year,
            histogram_genre: None,
            histogram: Vec::new(),
            color_map: ColorMap::default(),
            view: View::default(),
            status_message: None,
        };
        state.refresh_genres();
        state
    }

    /// Re-run the whole analysis after a table changed.
    pub fn reanalyse(&mut self) {
        let mut settings = self.analysis.settings;
        settings.start_year = self.start_year;
        settings.end_year = self.end_year;
        self.analysis = analyse(self.movies.as_deref(), self.genres.as_deref(), settings);
        self.refresh_genres();
    }

    /// Rebuild genre colours and pick the histogram genre.
    fn refresh_genres(&mut self) {
        match &self.analysis.genres {
            Ok(summary) => {
                self.color_map =
                    ColorMap::new(summary.runtime_by_genre.iter().map(|g| g.genre.as_str()));
                let keep = self.histogram_genre.as_ref().is_some_and(|g| {
                    summary.runtime_by_genre.iter().any(|r| &r.genre == g)
                });
                if !keep {
                    self.histogram_genre = Some(summary.longest_runtime.clone());
                }
                self.status_message = None;
            }
            Err(e) => {
                log::warn!("Genre charts unavailable: {e}");
                self.color_map = ColorMap::default();
                self.histogram_genre = None;
                self.status_message = Some(format!("No genre data: {e}"));
            }
        }
        self.rebuild_histogram();
    }

    pub fn rebuild_histogram(&mut self) {
        self.histogram = self
            .histogram_genre
            .as_deref()
            .map(|g| self.analysis.runtime_histogram(g))
            .unwrap_or_default();
    }

    /// Apply the year range edited in the side panel.
    pub fn apply_year_range(&mut self) {
        if self.start_year > self.end_year {
            std::mem::swap(&mut self.start_year, &mut self.end_year);
        }
        let movies = self.movies.as_deref().unwrap_or_default();
        self.analysis
            .set_year_range(movies, self.start_year, self.end_year);
        if self.analysis.yearly.is_empty() {
            log::warn!(
                "No movies released in {}-{}, skipping the revenue/budget chart",
                self.start_year,
                self.end_year
            );
        }
    }

    pub fn set_histogram_genre(&mut self, genre: String) {
        self.histogram_genre = Some(genre);
        self.rebuild_histogram();
    }

    /// Replace the movies table from `path`.
    pub fn open_movies(&mut self, path: &Path) {
        match load_movies(path) {
            Ok(Some(movies)) => {
                self.movies = Some(movies);
                self.reanalyse();
            }
            Ok(None) => {
                self.status_message = Some(format!("Could not read {}", path.display()));
            }
            Err(e) => {
                log::error!("Failed to load movies: {e}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Replace the genres table from `path`.
    pub fn open_genres(&mut self, path: &Path) {
        match load_genres(path) {
            Ok(Some(genres)) => {
                self.genres = Some(genres);
                self.reanalyse();
            }
            Ok(None) => {
                self.status_message = Some(format!("Could not read {}", path.display()));
            }
            Err(e) => {
                log::error!("Failed to load genres: {e}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rusty_reels::error::AggregateError;

    use super::*;

    fn movies() -> Vec<Movie> {
        (0..4)
            .map(|i| Movie {
                id: i,
                title: format!("movie {i}"),
                release_date: NaiveDate::from_ymd_opt(2012, 5, 1),
                vote_count: Some(10 * i as u64),
                vote_average: 5.0 + i as f64,
                revenue: Some(100.0),
                budget: Some(10.0),
                runtime: Some(90.0 + i as f64),
                genre_id: Some(i % 2),
            })
            .collect()
    }

    #[test]
    fn genre_failure_keeps_yearly_chart_and_sets_status() {
        let movies = movies();
        let unrelated = vec![Genre {
            id: 42,
            name: "Western".into(),
        }];
        let analysis = analyse(Some(&movies[..]), Some(&unrelated[..]), Settings::default());
        let state = AppState::new(Some(movies), Some(unrelated), analysis);

        assert_eq!(state.analysis.genres, Err(AggregateError::NoGroups));
        assert!(!state.analysis.yearly.is_empty());
        assert!(state.histogram_genre.is_none());
        assert!(state.histogram.is_empty());
        assert!(state
            .status_message
            .as_deref()
            .is_some_and(|m| m.contains("No genre data")));
    }

    #[test]
    fn loading_matching_genres_clears_the_failure() {
        let movies = movies();
        let analysis = analyse(Some(&movies[..]), None, Settings::default());
        let mut state = AppState::new(Some(movies), None, analysis);
        assert!(state.status_message.is_some());

        state.genres = Some(vec![
            Genre {
                id: 0,
                name: "Drama".into(),
            },
            Genre {
                id: 1,
                name: "Comedy".into(),
            },
        ]);
        state.reanalyse();
        assert!(state.status_message.is_none());
        assert_eq!(state.histogram_genre.as_deref(), Some("Comedy"));
        assert!(!state.histogram.is_empty());
    }
}
