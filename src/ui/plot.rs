use eframe::egui::{Color32, Ui};
use egui_extras::{Column, TableBuilder};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints};
use rusty_reels::chart::millions;

use crate::state::{AppState, View};

// ---------------------------------------------------------------------------
// Central panel
// ---------------------------------------------------------------------------

/// Render the chart selected in the top bar.
pub fn central_view(ui: &mut Ui, state: &AppState) {
    match state.view {
        View::RevenueBudget => revenue_budget_chart(ui, state),
        View::RuntimeHistogram => runtime_histogram(ui, state),
        View::RuntimeByGenre => runtime_by_genre_chart(ui, state),
        View::TopRated => top_rated_table(ui, state),
    }
}

fn placeholder(ui: &mut Ui, text: &str) {
    ui.centered_and_justified(|ui: &mut Ui| {
        ui.heading(text);
    });
}

// ---------------------------------------------------------------------------
// Revenue & budget per year
// ---------------------------------------------------------------------------

/// Mean budget as a line over mean revenue bars, one point per release year.
fn revenue_budget_chart(ui: &mut Ui, state: &AppState) {
    let yearly = &state.analysis.yearly;
    let settings = &state.analysis.settings;
    if yearly.is_empty() {
        placeholder(
            ui,
            &format!(
                "No movies released in {}-{}",
                settings.start_year, settings.end_year
            ),
        );
        return;
    }

    ui.heading(format!(
        "Average movie revenue and budget, {}-{}",
        settings.start_year, settings.end_year
    ));

    let bars: Vec<Bar> = yearly
        .iter()
        .filter_map(|row| {
            let revenue = row.revenue?;
            Some(
                Bar::new(row.release_year as f64, revenue)
                    .width(0.6)
                    .name(format!("{}: {}", row.release_year, millions(revenue))),
            )
        })
        .collect();

    let budget: PlotPoints = yearly
        .iter()
        .filter_map(|row| Some([row.release_year as f64, row.budget?]))
        .collect();

    Plot::new("revenue_budget_plot")
        .legend(Legend::default())
        .x_axis_label("Release year")
        .y_axis_label("Amount")
        .x_axis_formatter(|mark, _range| format!("{:.0}", mark.value))
        .y_axis_formatter(|mark, _range| millions(mark.value))
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name("Revenue").color(Color32::BLUE));
            plot_ui.line(
                Line::new(budget)
                    .name("Budget")
                    .color(Color32::RED)
                    .width(2.0),
            );
        });
}

// ---------------------------------------------------------------------------
// Runtime histogram of one genre
// ---------------------------------------------------------------------------

fn runtime_histogram(ui: &mut Ui, state: &AppState) {
    let Some(genre) = state.histogram_genre.as_deref() else {
        placeholder(ui, "No genre data loaded");
        return;
    };
    if state.histogram.is_empty() {
        placeholder(ui, &format!("No runtimes for {genre}"));
        return;
    }

    ui.heading(format!("Runtime histogram: {genre}"));

    let color = state.color_map.color_for(genre);
    let bars: Vec<Bar> = state
        .histogram
        .iter()
        .map(|bin| {
            Bar::new(bin.center(), bin.count as f64)
                .width(bin.width())
                .name(format!("{:.0}–{:.0} min", bin.start, bin.end))
                .fill(color)
                .stroke((1.0, Color32::BLACK))
        })
        .collect();

    Plot::new("runtime_histogram_plot")
        .x_axis_label("Runtime (minutes)")
        .y_axis_label("Movies")
        .allow_drag(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name(genre));
        });
}

// ---------------------------------------------------------------------------
// Mean runtime per genre
// ---------------------------------------------------------------------------

fn runtime_by_genre_chart(ui: &mut Ui, state: &AppState) {
    let summary = match &state.analysis.genres {
        Ok(summary) => summary,
        Err(e) => {
            placeholder(ui, &format!("No genre data: {e}"));
            return;
        }
    };

    ui.heading("Average runtime by genre");

    let genres = &summary.runtime_by_genre;
    let names: Vec<String> = genres.iter().map(|g| g.genre.clone()).collect();
    Plot::new("runtime_by_genre_plot")
        .legend(Legend::default())
        .y_axis_label("Minutes")
        .x_axis_formatter(move |mark, _range| {
            let idx = mark.value.round();
            if (mark.value - idx).abs() > 1e-6 || idx < 0.0 {
                return String::new();
            }
            names.get(idx as usize).cloned().unwrap_or_default()
        })
        .allow_drag(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for (i, g) in genres.iter().enumerate() {
                let Some(runtime) = g.runtime else {
                    continue;
                };
                let color = state.color_map.color_for(&g.genre);
                let bar = Bar::new(i as f64, runtime)
                    .width(0.7)
                    .name(format!("{:.1} min", runtime))
                    .fill(color);
                plot_ui.bar_chart(BarChart::new(vec![bar]).name(&g.genre).color(color));
            }
        });
}

// ---------------------------------------------------------------------------
// Top rated table
// ---------------------------------------------------------------------------

fn top_rated_table(ui: &mut Ui, state: &AppState) {
    let rows = &state.analysis.top_rated;
    if rows.is_empty() {
        placeholder(ui, "No popular movies to rank");
        return;
    }

    ui.heading(format!("Top {} rated movies", state.analysis.settings.top_n));

    TableBuilder::new(ui)
        .striped(true)
        .column(Column::auto())
        .column(Column::remainder().at_least(200.0))
        .column(Column::auto())
        .column(Column::auto())
        .column(Column::auto())
        .header(20.0, |mut header| {
            for title in ["#", "Title", "Rating", "Votes", "Released"] {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|mut body| {
            for ranked in rows {
                body.row(18.0, |mut row| {
                    row.col(|ui| {
                        ui.label((ranked.rank + 1).to_string());
                    });
                    row.col(|ui| {
                        ui.label(&ranked.movie.title);
                    });
                    row.col(|ui| {
                        ui.label(format!("{:.1}", ranked.movie.vote_average));
                    });
                    row.col(|ui| {
                        ui.label(ranked.movie.vote_count.unwrap_or_default().to_string());
                    });
                    row.col(|ui| {
                        let released = ranked
                            .movie
                            .release_date
                            .map(|d| d.to_string())
                            .unwrap_or_default();
                        ui.label(released);
                    });
                });
            }
        });
}
