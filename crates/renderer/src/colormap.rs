//! Discrete colormaps for filled-contour plots.
//!
//! A [`ListedColormap`] holds one colour per contour band plus optional
//! "under" and "over" colours. A [`BoundaryNorm`] turns a data value into a
//! band index using the level boundaries. [`from_levels_and_colors`] builds
//! both from a level list and a colour list, the same contract as
//! matplotlib's helper of that name.

use serde::{Deserialize, Serialize};

use crate::error::ColormapError;

/// An RGBA colour, not premultiplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const TRANSPARENT: Color = Color::new(0, 0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GRAY: Color = Color::rgb(128, 128, 128);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parse `#rrggbb` (the `#` is optional, hex digits in either case).
    pub fn from_hex(hex: &str) -> Result<Self, ColormapError> {
        hex_to_rgb(hex)
            .map(|(r, g, b)| Self::rgb(r, g, b))
            .ok_or_else(|| ColormapError::InvalidHex(hex.to_string()))
    }

    pub fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    pub fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Parse a hex colour string to RGB.
pub fn hex_to_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }

    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

    Some((r, g, b))
}

/// Which ends of the level range get their own colour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Extend {
    #[default]
    Neither,
    Min,
    Max,
    Both,
}

impl Extend {
    pub fn extends_min(self) -> bool {
        matches!(self, Self::Min | Self::Both)
    }

    pub fn extends_max(self) -> bool {
        matches!(self, Self::Max | Self::Both)
    }

    /// Number of extra colours this extension needs.
    pub fn n_extend(self) -> usize {
        self.extends_min() as usize + self.extends_max() as usize
    }
}

/// A fixed list of colours sampled by index or by a normalized value.
#[derive(Debug, Clone, PartialEq)]
pub struct ListedColormap {
    name: String,
    colors: Vec<Color>,
    under: Option<Color>,
    over: Option<Color>,
    bad: Color,
}

impl ListedColormap {
    pub fn new(name: impl Into<String>, colors: Vec<Color>) -> Result<Self, ColormapError> {
        if colors.is_empty() {
            return Err(ColormapError::Empty);
        }
        Ok(Self {
            name: name.into(),
            colors,
            under: None,
            over: None,
            bad: Color::TRANSPARENT,
        })
    }

    pub fn with_under(mut self, color: Color) -> Self {
        self.under = Some(color);
        self
    }

    pub fn with_over(mut self, color: Color) -> Self {
        self.over = Some(color);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of in-range colours.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    pub fn under(&self) -> Option<Color> {
        self.under
    }

    pub fn over(&self) -> Option<Color> {
        self.over
    }

    pub fn bad(&self) -> Color {
        self.bad
    }

    /// Colour for values below the range: the under colour, else the first.
    pub fn under_or_first(&self) -> Color {
        self.under.unwrap_or(self.colors[0])
    }

    /// Colour for values above the range: the over colour, else the last.
    pub fn over_or_last(&self) -> Color {
        self.over.unwrap_or(self.colors[self.colors.len() - 1])
    }

    /// Colour at normalized position `t`.
    ///
    /// `[0, 1]` spans the listed colours (1.0 maps to the last one); values
    /// outside fall back to under/over, NaN to the bad colour.
    pub fn sample(&self, t: f64) -> Color {
        if t.is_nan() {
            return self.bad;
        }
        if t < 0.0 {
            return self.under_or_first();
        }
        if t > 1.0 {
            return self.over_or_last();
        }
        let n = self.colors.len();
        let idx = ((t * n as f64) as usize).min(n - 1);
        self.colors[idx]
    }
}

/// Where a value falls relative to the boundaries of a [`BoundaryNorm`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bin {
    Under,
    Bin(usize),
    Over,
    Bad,
}

/// Maps values to bands delimited by increasing boundaries.
///
/// Band `i` covers `boundaries[i] <= v < boundaries[i + 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryNorm {
    boundaries: Vec<f64>,
    extend: Extend,
}

impl BoundaryNorm {
    pub fn new(boundaries: Vec<f64>, extend: Extend) -> Result<Self, ColormapError> {
        check_levels(&boundaries)?;
        Ok(Self { boundaries, extend })
    }

    pub fn boundaries(&self) -> &[f64] {
        &self.boundaries
    }

    pub fn extend(&self) -> Extend {
        self.extend
    }

    /// Number of in-range bands.
    pub fn n_bins(&self) -> usize {
        self.boundaries.len() - 1
    }

    pub fn vmin(&self) -> f64 {
        self.boundaries[0]
    }

    pub fn vmax(&self) -> f64 {
        self.boundaries[self.boundaries.len() - 1]
    }

    pub fn bin(&self, value: f64) -> Bin {
        if value.is_nan() {
            return Bin::Bad;
        }
        if value < self.vmin() {
            return Bin::Under;
        }
        if value >= self.vmax() {
            return Bin::Over;
        }
        let above = self.boundaries.partition_point(|&b| b <= value);
        Bin::Bin(above - 1)
    }
}

/// Linear normalization of `[vmin, vmax]` onto `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearNorm {
    pub vmin: f64,
    pub vmax: f64,
}

impl LinearNorm {
    pub fn new(vmin: f64, vmax: f64) -> Self {
        Self { vmin, vmax }
    }

    /// Degenerate ranges map everything to 0.
    pub fn normalize(&self, value: f64) -> f64 {
        if self.vmax == self.vmin {
            return 0.0;
        }
        (value - self.vmin) / (self.vmax - self.vmin)
    }
}

/// A listed colormap paired with the boundary norm that indexes it.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscreteColormap {
    pub cmap: ListedColormap,
    pub norm: BoundaryNorm,
}

impl DiscreteColormap {
    /// Fill colour for a value, or `None` where nothing is drawn (NaN, or
    /// outside the levels on a side that is not extended).
    pub fn color(&self, value: f64) -> Option<Color> {
        match self.norm.bin(value) {
            Bin::Bin(i) => self.cmap.colors().get(i).copied(),
            Bin::Under if self.norm.extend().extends_min() => self.cmap.under(),
            Bin::Over if self.norm.extend().extends_max() => self.cmap.over(),
            _ => None,
        }
    }

    /// Same bands and colours, with values outside the levels left unfilled.
    ///
    /// Filled contours use this; the under/over colours stay available to
    /// the colorbar.
    pub fn unextended(&self) -> Self {
        Self {
            cmap: self.cmap.clone(),
            norm: BoundaryNorm {
                boundaries: self.norm.boundaries.clone(),
                extend: Extend::Neither,
            },
        }
    }

    /// One band per pair of consecutive `levels`, coloured by sampling
    /// `base` linearly over the level range at each band midpoint.
    ///
    /// The result does not extend; `base`'s end colours are kept as its
    /// under/over colours for colorbar extensions.
    pub fn from_linear(base: &ListedColormap, levels: &[f64]) -> Result<Self, ColormapError> {
        check_levels(levels)?;
        let norm = LinearNorm::new(levels[0], levels[levels.len() - 1]);
        let colors = levels
            .windows(2)
            .map(|w| base.sample(norm.normalize((w[0] + w[1]) / 2.0)))
            .collect();
        let cmap = ListedColormap::new(base.name(), colors)?
            .with_under(base.under_or_first())
            .with_over(base.over_or_last());
        Ok(Self {
            cmap,
            norm: BoundaryNorm::new(levels.to_vec(), Extend::Neither)?,
        })
    }
}

fn check_levels(levels: &[f64]) -> Result<(), ColormapError> {
    if levels.len() < 2 {
        return Err(ColormapError::InvalidLevels(format!(
            "need at least 2 levels, got {}",
            levels.len()
        )));
    }
    if levels.iter().any(|l| !l.is_finite()) || levels.windows(2).any(|w| w[1] <= w[0]) {
        return Err(ColormapError::InvalidLevels(
            "levels must be finite and strictly increasing".to_string(),
        ));
    }
    Ok(())
}

/// Build a colormap and norm from contour levels and colours.
///
/// `colors.len()` must equal `levels.len() - 1 + extend.n_extend()`. The
/// first colour becomes the under colour when the minimum is extended and
/// the last becomes the over colour when the maximum is.
pub fn from_levels_and_colors(
    levels: &[f64],
    colors: &[Color],
    extend: Extend,
) -> Result<DiscreteColormap, ColormapError> {
    check_levels(levels)?;
    let n_data = levels.len() - 1;
    let expected = n_data + extend.n_extend();
    if colors.len() != expected {
        return Err(ColormapError::ColorCountMismatch {
            expected,
            actual: colors.len(),
        });
    }

    let start = extend.extends_min() as usize;
    let mut cmap = ListedColormap::new("from_list", colors[start..start + n_data].to_vec())?;
    if extend.extends_min() {
        cmap = cmap.with_under(colors[0]);
    }
    if extend.extends_max() {
        cmap = cmap.with_over(colors[colors.len() - 1]);
    }

    Ok(DiscreteColormap {
        cmap,
        norm: BoundaryNorm::new(levels.to_vec(), extend)?,
    })
}

/// Evenly spaced values in `[start, stop)`, like numpy's `arange`.
///
/// Empty when `step` is not positive or the range is empty.
pub fn arange(start: f64, stop: f64, step: f64) -> Vec<f64> {
    if step.is_nan() || step <= 0.0 || stop.is_nan() || stop <= start {
        return Vec::new();
    }
    let n = ((stop - start) / step).ceil() as usize;
    (0..n).map(|i| start + i as f64 * step).collect()
}

/// First level of the moisture-uptake colormap (mm/day).
pub const CUSTOM_LEVEL_START: f64 = 0.0;
/// Exclusive end of the moisture-uptake levels (mm/day).
pub const CUSTOM_LEVEL_STOP: f64 = 30.0;
/// Spacing of the moisture-uptake levels (mm/day).
pub const CUSTOM_LEVEL_STEP: f64 = 0.5;

/// White through greens and grey-teals to deep blues.
pub const CUSTOM_COLORS: [&str; 60] = [
    "#ffffff", "#e1f3e1", "#cde9cd", "#b5deb4", "#87c686", "#72b671", "#60a95f", "#519b50",
    "#318230", "#237222", "#1a6419", "#267325", "#347c33", "#498949", "#649663", "#739872",
    "#839c83", "#8fa08f", "#8fa08f", "#8fa09f", "#6e8b91", "#6e8b91", "#6e8b91", "#658b91",
    "#5d8b91", "#548b91", "#488b91", "#488ba5", "#488ba8", "#488bb1", "#488bbc", "#4885bc",
    "#4882bc", "#4880bc", "#4876bc", "#486bbc", "#485fbc", "#485cbc", "#4857bc", "#484fbc",
    "#3b42b3", "#3138ac", "#242ca5", "#161e9b", "#0b1393", "#040c88", "#040c90", "#030a7f",
    "#040c88", "#040c83", "#040c79", "#040c74", "#040c7e", "#040c7b", "#040c76", "#040c76",
    "#040c71", "#040c71", "#040c6c", "#040c69",
];

/// Moisture-uptake levels: 0.0 to 29.5 every 0.5 mm/day.
pub fn custom_levels() -> Vec<f64> {
    arange(CUSTOM_LEVEL_START, CUSTOM_LEVEL_STOP, CUSTOM_LEVEL_STEP)
}

/// The moisture-uptake colormap: 59 bands plus the 60th colour for values
/// at or above the last level.
pub fn create_custom_colormap() -> Result<DiscreteColormap, ColormapError> {
    let colors = CUSTOM_COLORS
        .iter()
        .map(|hex| Color::from_hex(hex))
        .collect::<Result<Vec<_>, _>>()?;
    let mut map = from_levels_and_colors(&custom_levels(), &colors, Extend::Max)?;
    map.cmap.name = "moisture_uptake".to_string();
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_to_rgb() {
        assert_eq!(hex_to_rgb("#ff8000"), Some((255, 128, 0)));
        assert_eq!(hex_to_rgb("FF8000"), Some((255, 128, 0)));
        assert_eq!(hex_to_rgb("#ff80"), None);
        assert_eq!(hex_to_rgb("#gg0000"), None);
        assert_eq!(hex_to_rgb("#ffé000"), None);
    }

    #[test]
    fn test_arange_matches_numpy() {
        assert_eq!(arange(0.0, 2.0, 0.5), vec![0.0, 0.5, 1.0, 1.5]);
        assert_eq!(arange(0.0, 0.1, 0.15), vec![0.0]);
        assert!(arange(0.0, 0.0, 0.15).is_empty());
        assert!(arange(0.0, 1.0, 0.0).is_empty());
        assert_eq!(custom_levels().len(), 60);
    }

    #[test]
    fn test_sample_ends() {
        let cmap = ListedColormap::new("t", vec![Color::BLACK, Color::WHITE]).unwrap();
        assert_eq!(cmap.sample(0.0), Color::BLACK);
        assert_eq!(cmap.sample(0.49), Color::BLACK);
        assert_eq!(cmap.sample(0.5), Color::WHITE);
        assert_eq!(cmap.sample(1.0), Color::WHITE);
        assert_eq!(cmap.sample(f64::NAN), Color::TRANSPARENT);
    }

    #[test]
    fn test_linear_norm_degenerate() {
        assert_eq!(LinearNorm::new(1.0, 1.0).normalize(5.0), 0.0);
        assert_eq!(LinearNorm::new(0.0, 4.0).normalize(1.0), 0.25);
    }
}
