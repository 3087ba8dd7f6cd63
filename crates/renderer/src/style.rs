//! Figure styling shared by both case plots.

use serde::{Deserialize, Serialize};

/// Size, resolution and text settings of a figure.
///
/// Every field has a default, so a partial YAML/JSON block deserializes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotStyle {
    /// Figure width and height in inches.
    pub figsize: [f32; 2],
    /// Pixels per inch.
    pub dpi: f32,
    /// Tick label and axis title size in points.
    pub font_size: f32,
    /// Label of the colorbar.
    pub colorbar_label: String,
    /// Transect line width in points.
    pub line_width: f32,
}

impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            figsize: [18.0, 12.0],
            dpi: 600.0,
            font_size: 35.0,
            colorbar_label: "Moisture Uptake  (mm/day)".to_string(),
            line_width: 2.5,
        }
    }
}

impl PlotStyle {
    /// Figure size in pixels.
    pub fn pixel_size(&self) -> (u32, u32) {
        (
            (self.figsize[0] * self.dpi).round() as u32,
            (self.figsize[1] * self.dpi).round() as u32,
        )
    }

    /// Convert typographic points to pixels at this DPI.
    pub fn pt(&self, points: f32) -> f32 {
        points * self.dpi / 72.0
    }

    /// Font size in pixels.
    pub fn font_px(&self) -> f32 {
        self.pt(self.font_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pixel_size() {
        assert_eq!(PlotStyle::default().pixel_size(), (10800, 7200));
    }

    #[test]
    fn test_points_to_pixels() {
        let style = PlotStyle {
            dpi: 144.0,
            ..PlotStyle::default()
        };
        assert_eq!(style.pt(36.0), 72.0);
        assert_eq!(style.font_px(), 70.0);
    }
}
