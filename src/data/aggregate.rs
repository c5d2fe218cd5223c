use std::collections::BTreeMap;

use super::filter::in_year_range;
use super::model::{GenreCount, GenreRuntime, JoinedMovie, Movie, YearlyAggregate};
use crate::error::AggregateError;

/// Running sum of the present values of one column.
#[derive(Debug, Default, Clone, Copy)]
struct Mean {
    sum: f64,
    count: usize,
}

impl Mean {
    fn push(&mut self, value: Option<f64>) {
        if let Some(v) = value.filter(|v| !v.is_nan()) {
            self.sum += v;
            self.count += 1;
        }
    }

    fn value(self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

// ---------------------------------------------------------------------------
// Per-year aggregation
// ---------------------------------------------------------------------------

/// Mean revenue and budget per release year for movies released in
/// `start_year..=end_year`, ordered by ascending year.
///
/// Only years with at least one movie appear.
pub fn yearly_aggregate(movies: &[Movie], start_year: i32, end_year: i32) -> Vec<YearlyAggregate> {
    let mut groups: BTreeMap<i32, (Mean, Mean, usize)> = BTreeMap::new();
    for movie in in_year_range(movies, start_year, end_year) {
        let Some(year) = movie.release_year() else {
            continue;
        };
        let (revenue, budget, n) = groups.entry(year).or_default();
        revenue.push(movie.revenue);
        budget.push(movie.budget);
        *n += 1;
    }

    groups
        .into_iter()
        .map(|(release_year, (revenue, budget, movies))| YearlyAggregate {
            release_year,
            revenue: revenue.value(),
            budget: budget.value(),
            movies,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Per-genre aggregation
// ---------------------------------------------------------------------------

/// Mean runtime per genre, ordered by genre name.
///
/// Fails with [`AggregateError::NoGroups`] when there is nothing to group.
pub fn genre_mean_runtime(joined: &[JoinedMovie]) -> Result<Vec<GenreRuntime>, AggregateError> {
    let mut groups: BTreeMap<&str, Mean> = BTreeMap::new();
    for row in joined {
        groups
            .entry(row.genre.as_str())
            .or_default()
            .push(row.movie.runtime);
    }
    if groups.is_empty() {
        return Err(AggregateError::NoGroups);
    }

    Ok(groups
        .into_iter()
        .map(|(genre, runtime)| GenreRuntime {
            genre: genre.to_string(),
            runtime: runtime.value(),
        })
        .collect())
}

/// Number of movies per genre, ordered by genre name.
pub fn genre_counts(joined: &[JoinedMovie]) -> Vec<GenreCount> {
    let mut groups: BTreeMap<&str, usize> = BTreeMap::new();
    for row in joined {
        *groups.entry(row.genre.as_str()).or_default() += 1;
    }
    groups
        .into_iter()
        .map(|(genre, count)| GenreCount {
            genre: genre.to_string(),
            count,
        })
        .collect()
}

/// The genre with the most movies.
///
/// Ties go to the genre whose name sorts first.
pub fn top_genre_by_count(joined: &[JoinedMovie]) -> Result<GenreCount, AggregateError> {
    first_max(genre_counts(joined), |g| Some(g.count as f64)).ok_or(AggregateError::NoGroups)
}

/// The genre with the longest mean runtime.
///
/// Genres whose movies have no runtime are skipped. Ties go to the genre
/// whose name sorts first.
pub fn longest_runtime_genre(joined: &[JoinedMovie]) -> Result<String, AggregateError> {
    first_max(genre_mean_runtime(joined)?, |g| g.runtime)
        .map(|g| g.genre)
        .ok_or(AggregateError::NoGroups)
}

/// Runtimes of the movies of one genre, in table order.
pub fn genre_runtimes(joined: &[JoinedMovie], genre: &str) -> Vec<f64> {
    joined
        .iter()
        .filter(|row| row.genre == genre)
        .filter_map(|row| row.movie.runtime)
        .collect()
}

/// First element with the strictly largest key; `None` keys are ignored.
fn first_max<T>(items: Vec<T>, key: impl Fn(&T) -> Option<f64>) -> Option<T> {
    let mut best: Option<(f64, T)> = None;
    for item in items {
        let Some(k) = key(&item).filter(|k| !k.is_nan()) else {
            continue;
        };
        if best.as_ref().map_or(true, |(b, _)| k > *b) {
            best = Some((k, item));
        }
    }
    best.map(|(_, item)| item)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn movie(year: i32, revenue: f64, budget: f64) -> Movie {
        Movie {
            id: 0,
            title: String::new(),
            release_date: NaiveDate::from_ymd_opt(year, 1, 15),
            vote_count: None,
            vote_average: 0.0,
            revenue: Some(revenue),
            budget: Some(budget),
            runtime: None,
            genre_id: None,
        }
    }

    fn joined(genre: &str, runtime: Option<f64>) -> JoinedMovie {
        JoinedMovie {
            movie: Movie {
                runtime,
                ..movie(2000, 0.0, 0.0)
            },
            genre: genre.to_string(),
        }
    }

    #[test]
    fn yearly_means_match_hand_computation() {
        let movies = vec![
            movie(2011, 50.0, 10.0),
            movie(2010, 100.0, 30.0),
            movie(2010, 200.0, 60.0),
            movie(2010, 300.0, 90.0),
            movie(2016, 1.0, 1.0),
        ];
        let rows = yearly_aggregate(&movies, 2010, 2012);
        assert_eq!(
            rows,
            vec![
                YearlyAggregate {
                    release_year: 2010,
                    revenue: Some(200.0),
                    budget: Some(60.0),
                    movies: 3,
                },
                YearlyAggregate {
                    release_year: 2011,
                    revenue: Some(50.0),
                    budget: Some(10.0),
                    movies: 1,
                },
            ]
        );
    }

    #[test]
    fn yearly_means_skip_missing_values() {
        let mut no_revenue = movie(2010, 0.0, 40.0);
        no_revenue.revenue = None;
        let movies = vec![no_revenue, movie(2010, 10.0, 20.0)];
        let rows = yearly_aggregate(&movies, 2010, 2010);
        assert_eq!(rows[0].revenue, Some(10.0));
        assert_eq!(rows[0].budget, Some(30.0));
    }

    #[test]
    fn yearly_years_are_strictly_increasing_and_in_range() {
        let movies: Vec<Movie> = (1990..2020)
            .rev()
            .map(|y| movie(y, y as f64, 1.0))
            .collect();
        let rows = yearly_aggregate(&movies, 2000, 2009);
        assert_eq!(rows.len(), 10);
        assert!(rows.windows(2).all(|w| w[0].release_year < w[1].release_year));
        assert!(rows
            .iter()
            .all(|r| (2000..=2009).contains(&r.release_year)));
    }

    #[test]
    fn yearly_on_empty_range_is_empty() {
        assert!(yearly_aggregate(&[movie(2010, 1.0, 1.0)], 1900, 1901).is_empty());
        assert!(yearly_aggregate(&[], 2010, 2016).is_empty());
    }

    #[test]
    fn genre_runtime_means() {
        let rows = vec![
            joined("Drama", Some(120.0)),
            joined("Action", Some(100.0)),
            joined("Drama", Some(140.0)),
            joined("Action", None),
        ];
        let means = genre_mean_runtime(&rows).unwrap();
        assert_eq!(
            means,
            vec![
                GenreRuntime {
                    genre: "Action".into(),
                    runtime: Some(100.0),
                },
                GenreRuntime {
                    genre: "Drama".into(),
                    runtime: Some(130.0),
                },
            ]
        );
        assert_eq!(longest_runtime_genre(&rows).unwrap(), "Drama");
    }

    #[test]
    fn top_genre_counts_movies() {
        let rows = vec![
            joined("Drama", None),
            joined("Action", None),
            joined("Drama", None),
        ];
        assert_eq!(
            top_genre_by_count(&rows).unwrap(),
            GenreCount {
                genre: "Drama".into(),
                count: 2,
            }
        );
    }

    #[test]
    fn ties_go_to_first_genre_name() {
        let rows = vec![
            joined("Western", Some(90.0)),
            joined("Comedy", Some(90.0)),
        ];
        assert_eq!(top_genre_by_count(&rows).unwrap().genre, "Comedy");
        assert_eq!(longest_runtime_genre(&rows).unwrap(), "Comedy");
    }

    #[test]
    fn genre_aggregations_fail_without_groups() {
        assert_eq!(genre_mean_runtime(&[]), Err(AggregateError::NoGroups));
        assert_eq!(top_genre_by_count(&[]), Err(AggregateError::NoGroups));
        assert_eq!(longest_runtime_genre(&[]), Err(AggregateError::NoGroups));
    }

    #[test]
    fn longest_runtime_needs_a_runtime() {
        let rows = vec![joined("Drama", None)];
        assert_eq!(longest_runtime_genre(&rows), Err(AggregateError::NoGroups));
    }

    #[test]
    fn runtimes_of_one_genre() {
        let rows = vec![
            joined("Drama", Some(120.0)),
            joined("Action", Some(100.0)),
            joined("Drama", None),
            joined("Drama", Some(95.0)),
        ];
        assert_eq!(genre_runtimes(&rows, "Drama"), vec![120.0, 95.0]);
        assert!(genre_runtimes(&rows, "Horror").is_empty());
    }
}
