mod app;
mod color;
mod config;
mod state;
mod ui;

use anyhow::{anyhow, bail, Context, Result};
use app::RustyReelsApp;
use clap::Parser;
use config::Config;
use eframe::egui;
use rusty_reels::data::loader::{load_genres, load_movies};
use rusty_reels::report::analyse;
use state::AppState;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = Config::parse();
    let settings = config.settings()?;

    let movies = load_movies(&config.movies)
        .with_context(|| format!("loading movies from {}", config.movies.display()))?;
    let genres = load_genres(&config.genres)
        .with_context(|| format!("loading genres from {}", config.genres.display()))?;

    let analysis = analyse(movies.as_deref(), genres.as_deref(), settings);
    print!("{analysis}");
    if config.no_gui {
        if let Err(e) = &analysis.genres {
            bail!("cannot summarise genres: {e}");
        }
        return Ok(());
    }
    // The window still opens; genre charts show the failure instead.
    if let Err(e) = &analysis.genres {
        log::error!("cannot summarise genres: {e}");
    }

    let state = AppState::new(movies, genres, analysis);
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Rusty Reels – TMDB Explorer",
        options,
        Box::new(move |_cc| Ok(Box::new(RustyReelsApp::new(state)))),
    )
    .map_err(|e| anyhow!("chart window failed: {e}"))
}
