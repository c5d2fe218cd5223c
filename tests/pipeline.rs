//! End-to-end run over files written to a temporary directory.

use rusty_reels::data::aggregate::{genre_mean_runtime, top_genre_by_count};
use rusty_reels::data::filter::{in_year_range, quantile, top_rated};
use rusty_reels::data::join::join_genres;
use rusty_reels::data::loader::{load_genres, load_movies};
use rusty_reels::error::AggregateError;
use rusty_reels::report::{analyse, Settings};
use tempfile::tempdir;

const MOVIES: &str = "\
id,title,release_date,vote_count,vote_average,revenue,budget,runtime,genre_id
1,Alpha,2010-03-01,50,6.1,100,10,90,0
2,Bravo,2010-07-04,900,8.2,200,20,100,1
3,Charlie,2010-11-11,40,5.0,300,30,110,1
4,Delta,2011-02-02,800,7.9,400,40,150,2
5,Echo,2014-05-05,30,9.9,500,50,95,0
6,Foxtrot,,1000,7.0,600,60,130,1
7,Golf,2016-12-31,20,4.0,700,70,85,99
8,Hotel,2009-01-01,10,3.0,800,80,120,
";

const GENRES: &str = "\
,genres
0,Comedy
1,Drama
2,History
";

#[test]
fn full_run_from_files() {
    let dir = tempdir().unwrap();
    let movies_path = dir.path().join("tmdb_movies.csv");
    let genres_path = dir.path().join("tmdb_genres.csv");
    std::fs::write(&movies_path, MOVIES).unwrap();
    std::fs::write(&genres_path, GENRES).unwrap();

    let movies = load_movies(&movies_path).unwrap().expect("movies");
    let genres = load_genres(&genres_path).unwrap().expect("genres");
    assert_eq!(movies.len(), 8);
    assert_eq!(genres.len(), 3);

    // vote counts sorted: 10 20 30 40 50 800 900 1000 → Q3 at 5.25 = 825
    let counts: Vec<f64> = movies
        .iter()
        .filter_map(|m| m.vote_count)
        .map(|c| c as f64)
        .collect();
    assert_eq!(quantile(&counts, 0.75), Some(825.0));
    let ranked = top_rated(&movies, 10);
    let top: Vec<&str> = ranked.iter().map(|r| r.movie.title.as_str()).collect();
    assert_eq!(top, vec!["Bravo", "Foxtrot"]);

    let in_2010: Vec<i64> = in_year_range(&movies, 2010, 2010)
        .iter()
        .map(|m| m.id)
        .collect();
    assert_eq!(in_2010, vec![1, 2, 3]);

    let analysis = analyse(Some(&movies[..]), Some(&genres[..]), Settings::default());
    let y2010 = &analysis.yearly[0];
    assert_eq!(y2010.release_year, 2010);
    assert_eq!(y2010.revenue, Some(200.0));
    assert_eq!(y2010.budget, Some(20.0));
    let years: Vec<i32> = analysis.yearly.iter().map(|r| r.release_year).collect();
    assert_eq!(years, vec![2010, 2011, 2014, 2016]);

    // Golf (genre 99) and Hotel (no genre) are dropped by the join.
    assert_eq!(analysis.joined.len(), 6);
    let summary = analysis.genres.as_ref().expect("genre summary");
    assert_eq!(summary.top_genre.genre, "Drama");
    assert_eq!(summary.top_genre.count, 3);
    assert_eq!(summary.longest_runtime, "History");

    let report = analysis.to_string();
    assert!(report.contains("Bravo"));
    assert!(report.contains("The most common genre is Drama, with 3 movies."));
}

#[test]
fn genre_steps_fail_when_nothing_joins() {
    let dir = tempdir().unwrap();
    let movies_path = dir.path().join("tmdb_movies.csv");
    let genres_path = dir.path().join("tmdb_genres.csv");
    std::fs::write(&movies_path, MOVIES).unwrap();
    std::fs::write(&genres_path, ",genres\n42,Western\n").unwrap();

    let movies = load_movies(&movies_path).unwrap().expect("movies");
    let genres = load_genres(&genres_path).unwrap().expect("genres");
    let joined = join_genres(&movies, &genres);
    assert!(joined.is_empty());
    assert_eq!(genre_mean_runtime(&joined), Err(AggregateError::NoGroups));
    assert_eq!(top_genre_by_count(&joined), Err(AggregateError::NoGroups));

    // the rating and range path is unaffected
    let analysis = analyse(Some(&movies[..]), Some(&genres[..]), Settings::default());
    assert!(!analysis.top_rated.is_empty());
    assert!(!analysis.yearly.is_empty());
    assert_eq!(analysis.genres, Err(AggregateError::NoGroups));
}
