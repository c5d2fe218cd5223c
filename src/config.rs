use std::path::PathBuf;

use anyhow::{ensure, Result};
use clap::Parser;
use rusty_reels::report::Settings;

#[derive(Parser, Debug, Clone)]
#[command(name = "rusty-reels")]
#[command(about = "Rank, aggregate and chart the TMDB movies dataset")]
#[command(version)]
pub struct Config {
    /// Movies table (.csv, .tsv, .json or .parquet)
    #[arg(long, default_value = "tmdb_movies.csv", env = "TMDB_MOVIES")]
    pub movies: PathBuf,

    /// Genres table, keyed by the movies' genre_id
    #[arg(long, default_value = "tmdb_genres.csv", env = "TMDB_GENRES")]
    pub genres: PathBuf,

    /// First release year of the revenue/budget chart
    #[arg(long, default_value_t = 2010)]
    pub start_year: i32,

    /// Last release year of the revenue/budget chart (inclusive)
    #[arg(long, default_value_t = 2016)]
    pub end_year: i32,

    /// Length of the top-rated list
    #[arg(long, default_value_t = 10)]
    pub top_n: usize,

    /// Runtime histogram bins
    #[arg(long, default_value_t = 10)]
    pub bins: usize,

    /// Print the report without opening the chart window
    #[arg(long)]
    pub no_gui: bool,
}

impl Config {
    pub fn settings(&self) -> Result<Settings> {
        ensure!(
            self.start_year <= self.end_year,
            "--start-year {} is after --end-year {}",
            self.start_year,
            self.end_year
        );
        ensure!(self.bins > 0, "--bins must be at least 1");
        Ok(Settings {
            start_year: self.start_year,
            end_year: self.end_year,
            top_n: self.top_n,
            bins: self.bins,
        })
    }
}
