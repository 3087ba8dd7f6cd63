//! Tests for the discrete colormaps used by both plots.

use renderer::colormap::{
    arange, create_custom_colormap, custom_levels, from_levels_and_colors, Bin, Color,
    DiscreteColormap, Extend, ListedColormap, CUSTOM_COLORS,
};
use renderer::ColormapError;
use test_utils::assert_approx_eq;

#[test]
fn test_custom_levels_cover_zero_to_thirty() {
    let levels = custom_levels();
    assert_eq!(levels.len(), 60);
    assert_approx_eq!(levels[0], 0.0, 1e-12);
    assert_approx_eq!(levels[59], 29.5, 1e-12);
    assert_eq!(CUSTOM_COLORS.len(), levels.len());
}

#[test]
fn test_custom_colormap_extends_max_only() {
    let cmap = create_custom_colormap().unwrap();
    assert_eq!(cmap.norm.extend(), Extend::Max);
    assert_eq!(cmap.cmap.len(), 59);
    assert_eq!(cmap.cmap.name(), "moisture_uptake");

    // Below the first level nothing is filled.
    assert_eq!(cmap.color(-0.1), None);
    // First band takes the first colour.
    assert_eq!(cmap.color(0.2), Some(Color::from_hex(CUSTOM_COLORS[0]).unwrap()));
    // Above the last level the over colour is used.
    assert_eq!(cmap.color(45.0), Some(Color::from_hex(CUSTOM_COLORS[59]).unwrap()));
    assert_eq!(cmap.color(f64::NAN), None);
}

#[test]
fn test_boundary_bins() {
    let cmap = create_custom_colormap().unwrap();
    assert_eq!(cmap.norm.bin(0.0), Bin::Bin(0));
    assert_eq!(cmap.norm.bin(0.49), Bin::Bin(0));
    assert_eq!(cmap.norm.bin(0.5), Bin::Bin(1));
    assert_eq!(cmap.norm.bin(29.4), Bin::Bin(58));
    assert_eq!(cmap.norm.bin(29.5), Bin::Over);
    assert_eq!(cmap.norm.bin(-1.0), Bin::Under);
}

#[test]
fn test_from_levels_and_colors_checks_count() {
    let colors = [Color::RED, Color::BLACK, Color::WHITE];
    let err = from_levels_and_colors(&[0.0, 1.0, 2.0], &colors, Extend::Neither).unwrap_err();
    assert!(matches!(
        err,
        ColormapError::ColorCountMismatch {
            expected: 2,
            actual: 3
        }
    ));
    assert!(from_levels_and_colors(&[0.0, 1.0, 2.0], &colors, Extend::Max).is_ok());

    let both = from_levels_and_colors(&[0.0, 1.0], &colors, Extend::Both).unwrap();
    assert_eq!(both.color(-5.0), Some(Color::RED));
    assert_eq!(both.color(0.5), Some(Color::BLACK));
    assert_eq!(both.color(5.0), Some(Color::WHITE));
}

#[test]
fn test_levels_must_increase() {
    let colors = [Color::RED, Color::BLACK];
    assert!(from_levels_and_colors(&[0.0, 0.0, 1.0], &colors, Extend::Neither).is_err());
    assert!(from_levels_and_colors(&[1.0], &[], Extend::Neither).is_err());
}

#[test]
fn test_from_linear_samples_band_midpoints() {
    let base = ListedColormap::new("ramp", vec![Color::BLACK, Color::WHITE]).unwrap();
    let levels = arange(0.0, 1.0, 0.25);
    assert_eq!(levels.len(), 4);

    let cmap = DiscreteColormap::from_linear(&base, &levels).unwrap();
    assert_eq!(cmap.cmap.len(), 3);
    assert_eq!(cmap.norm.extend(), Extend::Neither);
    assert_eq!(cmap.cmap.under(), Some(Color::BLACK));
    assert_eq!(cmap.cmap.over(), Some(Color::WHITE));
    // Values past the top level stay unfilled.
    assert_eq!(cmap.color(0.9), None);
    assert!(cmap.color(0.1).is_some());
}

#[test]
fn test_arange_excludes_stop() {
    assert_eq!(arange(0.0, 1.5, 0.5).len(), 3);
    assert_eq!(arange(0.0, 1.6, 0.5).len(), 4);
    assert!(arange(0.0, 0.0, 0.15).is_empty());
    assert!(arange(0.0, 1.0, -0.5).is_empty());
}

#[test]
fn test_unextended_leaves_over_range_unfilled() {
    let cmap = create_custom_colormap().unwrap();
    let fill = cmap.unextended();

    assert_eq!(fill.color(35.0), None);
    assert_eq!(fill.color(29.5), None);
    assert_eq!(fill.color(-1.0), None);
    assert_eq!(fill.color(0.2), cmap.color(0.2));
    assert_eq!(fill.cmap.over(), cmap.cmap.over());
    assert!(cmap.color(35.0).is_some());
}
