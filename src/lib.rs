//! Exploratory analysis of the TMDB movies dataset: load the movies and
//! genres tables, rank and filter movies, aggregate them per year and per
//! genre, and prepare the results for charting.

pub mod chart;
pub mod data;
pub mod error;
pub mod report;
