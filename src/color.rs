use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: genre name → Color32
// ---------------------------------------------------------------------------

/// Maps genre names to distinct colours, stable for a given set of genres.
#[derive(Debug, Clone, Default)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
}

impl ColorMap {
    pub fn new<'a>(genres: impl IntoIterator<Item = &'a str>) -> Self {
        let names: Vec<&str> = genres.into_iter().collect();
        let mapping = names
            .iter()
            .zip(generate_palette(names.len()))
            .map(|(name, c)| (name.to_string(), c))
            .collect();
        ColorMap { mapping }
    }

    pub fn color_for(&self, genre: &str) -> Color32 {
        self.mapping.get(genre).copied().unwrap_or(Color32::GRAY)
    }

    /// Return the legend entries (genre → colour) for the UI.
    pub fn legend_entries(&self) -> impl Iterator<Item = (&str, Color32)> + '_ {
        self.mapping.iter().map(|(g, c)| (g.as_str(), *c))
    }
}
