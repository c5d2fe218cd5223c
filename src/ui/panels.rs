use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::state::{AppState, View};

// ---------------------------------------------------------------------------
// Left side panel – year range, histogram genre, summary
// ---------------------------------------------------------------------------

/// Render the left control panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Controls");
    ui.separator();

    if state.movies.is_none() {
        ui.label("No movies loaded.");
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Year range of the revenue/budget chart ----
            ui.strong("Release years");
            let mut changed = false;
            ui.horizontal(|ui: &mut Ui| {
                changed |= ui
                    .add(egui::DragValue::new(&mut state.start_year).range(1870..=2100))
                    .changed();
                ui.label("to");
                changed |= ui
                    .add(egui::DragValue::new(&mut state.end_year).range(1870..=2100))
                    .changed();
            });
            if changed {
                state.apply_year_range();
            }
            ui.label(format!("{} years with movies", state.analysis.yearly.len()));
            ui.separator();

            // ---- Histogram genre selector ----
            let names: Vec<String> = match &state.analysis.genres {
                Ok(summary) => summary
                    .runtime_by_genre
                    .iter()
                    .map(|g| g.genre.clone())
                    .collect(),
                Err(_) => Vec::new(),
            };
            ui.strong("Histogram genre");
            let current = state.histogram_genre.clone().unwrap_or_default();
            egui::ComboBox::from_id_salt("histogram_genre")
                .selected_text(&current)
                .show_ui(ui, |ui: &mut Ui| {
                    for name in &names {
                        let text = RichText::new(name).color(state.color_map.color_for(name));
                        if ui.selectable_label(current == *name, text).clicked() {
                            state.set_histogram_genre(name.clone());
                        }
                    }
                });
            ui.separator();

            // ---- Genre summary ----
            egui::CollapsingHeader::new(RichText::new("Genres").strong())
                .default_open(true)
                .show(ui, |ui: &mut Ui| match &state.analysis.genres {
                    Ok(summary) => {
                        ui.label(format!("Most common: {}", summary.top_genre));
                        ui.label(format!("Longest runtime: {}", summary.longest_runtime));
                        for (genre, color) in state.color_map.legend_entries() {
                            ui.label(RichText::new(genre).color(color));
                        }
                    }
                    Err(e) => {
                        ui.label(format!("Unavailable: {e}"));
                    }
                });
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open movies…").clicked() {
                open_file_dialog(state, Table::Movies);
                ui.close_menu();
            }
            if ui.button("Open genres…").clicked() {
                open_file_dialog(state, Table::Genres);
                ui.close_menu();
            }
        });

        ui.separator();

        ui.selectable_value(&mut state.view, View::RevenueBudget, "Revenue & budget");
        ui.selectable_value(&mut state.view, View::RuntimeHistogram, "Runtime histogram");
        ui.selectable_value(&mut state.view, View::RuntimeByGenre, "Runtime by genre");
        ui.selectable_value(&mut state.view, View::TopRated, "Top rated");

        ui.separator();

        if let Some(movies) = &state.movies {
            ui.label(format!(
                "{} movies, {} with a known genre",
                movies.len(),
                state.analysis.joined.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
pub enum Table {
    Movies,
    Genres,
}

pub fn open_file_dialog(state: &mut AppState, table: Table) {
    let title = match table {
        Table::Movies => "Open movies table",
        Table::Genres => "Open genres table",
    };
    let file = rfd::FileDialog::new()
        .set_title(title)
        .add_filter("Supported files", &["csv", "tsv", "tab", "json", "parquet", "pq"])
        .add_filter("CSV / TSV", &["csv", "tsv", "tab"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        log::info!("Opening {}", path.display());
        match table {
            Table::Movies => state.open_movies(&path),
            Table::Genres => state.open_genres(&path),
        }
    }
}
