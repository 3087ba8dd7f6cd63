//! Filled-contour plot of a cross-section: path coordinate against layer.

use case_common::Axis;
use cross_section::{bilinear_interpolate, CrossSection};
use image::RgbaImage;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::axes::{format_tick, nice_step, nice_ticks, Axes};
use crate::colorbar::{draw_colorbar, Orientation};
use crate::colormap::{arange, Color, DiscreteColormap, ListedColormap};
use crate::contour::fill_contours;
use crate::error::{RenderError, RenderResult};
use crate::figure::{Figure, LineStyle, PxRect};
use crate::style::PlotStyle;
use crate::text::{HAlign, VAlign};

/// Contour spacing and vertical axis labelling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionOptions {
    /// Spacing of contour levels starting at zero.
    pub level_interval: f64,
    /// Pressure label for each layer, bottom layer first.
    pub pressure_labels: Vec<u32>,
    pub y_label: String,
}

impl Default for SectionOptions {
    fn default() -> Self {
        Self {
            level_interval: 0.15,
            pressure_labels: vec![1000, 900, 850, 750, 700, 600, 500, 300, 200, 100],
            y_label: "Pressure (hPa)".to_string(),
        }
    }
}

/// Contour levels `0, interval, ...` below the section's largest value.
pub fn section_levels(section: &CrossSection, interval: f64) -> RenderResult<Vec<f64>> {
    if interval.is_nan() || interval <= 0.0 {
        return Err(RenderError::NoData(format!(
            "level interval must be positive, got {interval}"
        )));
    }
    let max = section.nanmax().ok_or_else(|| {
        RenderError::NoData(format!("cross-section of '{}' is all NaN", section.variable))
    })?;
    let levels = arange(0.0, max as f64, interval);
    if levels.len() < 2 {
        return Err(RenderError::NoData(format!(
            "maximum {max} of '{}' gives fewer than two levels at interval {interval}",
            section.variable
        )));
    }
    Ok(levels)
}

/// Horizontal coordinate as an axis, or the step index when the path
/// coordinate is not strictly monotonic.
fn path_axis(section: &CrossSection) -> RenderResult<(String, Axis)> {
    let (label, xs) = section.horizontal_axis();
    match Axis::new(label, xs) {
        Ok(axis) => Ok((label.to_string(), axis)),
        Err(e) => {
            warn!(error = %e, "Path coordinate not monotonic, plotting against step index");
            let steps = (0..section.steps()).map(|i| i as f64).collect();
            let axis = Axis::new("Step", steps)
                .map_err(|e| RenderError::NoData(format!("path steps: {e}")))?;
            Ok(("Step".to_string(), axis))
        }
    }
}

const COLORBAR_SHRINK: f32 = 0.9;
const COLORBAR_ASPECT: f32 = 25.0;

/// Render `section` with levels from [`section_levels`], colours sampled
/// from `base`.
pub fn render_cross_section(
    section: &CrossSection,
    base: &ListedColormap,
    style: &PlotStyle,
    options: &SectionOptions,
) -> RenderResult<RgbaImage> {
    let (steps, layers) = (section.steps(), section.num_layers());
    if steps < 2 || layers < 2 {
        return Err(RenderError::NoData(format!(
            "cross-section needs at least 2 steps and 2 layers, got {steps} and {layers}"
        )));
    }
    let levels = section_levels(section, options.level_interval)?;
    let colormap = DiscreteColormap::from_linear(base, &levels)?;

    let (x_label, x_axis) = path_axis(section)?;
    let y_axis = Axis::new(section.layer_name.clone(), section.layers.clone())
        .map_err(|e| RenderError::NoData(format!("layer coordinate: {e}")))?;

    let (fw, fh) = style.pixel_size();
    let mut fig = Figure::new(fw, fh)?;
    let font = style.font_px();
    let pad = font;

    let left = pad + font * 1.5 + font * 0.62 * 4.5 + font * 0.5;
    let bottom = pad + font * 1.6 + font * 1.5;
    let ah = fh as f32 - pad - bottom;
    let bar_h = ah * COLORBAR_SHRINK;
    let bar_w = bar_h / COLORBAR_ASPECT;
    let bar_pad = fw as f32 * 0.04;
    let right = bar_pad + bar_w + font * 0.45 + font * 0.62 * 5.0 + font * 1.5 + pad;
    let aw = fw as f32 - left - right;
    if aw < 1.0 || ah < 1.0 {
        return Err(RenderError::InvalidCanvas(format!(
            "a {fw}x{fh} figure leaves no room for the plot at font size {}",
            style.font_size
        )));
    }

    let rect = PxRect::new(left.floor(), pad.floor(), aw.floor(), ah.floor());
    let axes = Axes::new(rect, x_axis.range(), y_axis.range());
    let (pw, ph) = (rect.w as u32, rect.h as u32);

    let pixels = fill_contours(pw, ph, &colormap, |col, row| {
        let (x, y) = axes.pixel_to_data(col, row, pw, ph);
        match (x_axis.fractional_index(x), y_axis.fractional_index(y)) {
            (Some(fx), Some(fy)) => bilinear_interpolate(&section.values, steps, layers, fx, fy),
            _ => f32::NAN,
        }
    });
    fig.draw_rgba(rect.x as i32, rect.y as i32, pw, ph, &pixels)?;

    let tick_len = font * 0.35;
    let tick_style = LineStyle::solid(Color::BLACK, style.pt(0.8));

    let (x0, x1) = x_axis.range();
    let x_step = nice_step(x1 - x0, 6);
    for x in nice_ticks(x0, x1, 6) {
        let px = axes.x_to_px(x);
        fig.line((px, rect.bottom()), (px, rect.bottom() + tick_len), &tick_style);
        fig.text(
            format_tick(x, x_step),
            px,
            rect.bottom() + tick_len + font * 0.2,
            font,
            Color::BLACK,
            HAlign::Center,
            VAlign::Top,
        );
    }

    if options.pressure_labels.len() < layers {
        warn!(
            labels = options.pressure_labels.len(),
            layers,
            "Fewer pressure labels than layers, upper layers left unlabelled"
        );
    }
    for (layer, label) in section.layers.iter().zip(&options.pressure_labels) {
        let py = axes.y_to_px(*layer);
        fig.line((rect.x - tick_len, py), (rect.x, py), &tick_style);
        fig.text(
            label.to_string(),
            rect.x - tick_len - font * 0.2,
            py,
            font,
            Color::BLACK,
            HAlign::Right,
            VAlign::Center,
        );
    }

    fig.stroke_rect(rect, &LineStyle::solid(Color::BLACK, style.pt(1.0)));

    fig.text(
        x_label,
        rect.center_x(),
        rect.bottom() + tick_len + font * 1.6,
        font,
        Color::BLACK,
        HAlign::Center,
        VAlign::Top,
    );
    fig.vertical_text(
        options.y_label.clone(),
        pad + font * 0.6,
        rect.center_y(),
        font,
        Color::BLACK,
    );

    let bar = PxRect::new(
        rect.right() + bar_pad,
        rect.y + (rect.h - bar_h) / 2.0,
        bar_w,
        bar_h,
    );
    draw_colorbar(
        &mut fig,
        bar,
        &colormap,
        Orientation::Vertical,
        &style.colorbar_label,
        font,
    );

    let img = fig.finish()?;
    info!(
        variable = %section.variable,
        levels = levels.len(),
        steps,
        layers,
        width = img.width(),
        height = img.height(),
        "Rendered cross-section"
    );
    Ok(img)
}

#[cfg(test)]
mod tests {
    use super::*;
    use case_common::GeoPoint;

    fn section(values: Vec<f32>, layers: Vec<f64>, steps: usize) -> CrossSection {
        let points: Vec<GeoPoint> = (0..steps)
            .map(|i| GeoPoint::new(30.0 + i as f64, -66.0 - i as f64))
            .collect();
        CrossSection {
            variable: "E_P_integrated_layers".to_string(),
            units: None,
            start: points[0],
            end: points[steps - 1],
            indices: vec![None; steps],
            points,
            layer_name: "layers".to_string(),
            layers,
            values,
        }
    }

    #[test]
    fn test_section_levels_follow_interval() {
        let s = section(vec![0.0, 0.2, 0.4, 0.5], vec![1.0, 2.0], 2);
        let levels = section_levels(&s, 0.15).unwrap();
        assert_eq!(levels.len(), 4);
        assert!((levels[3] - 0.45).abs() < 1e-9);
    }

    #[test]
    fn test_section_levels_rejects_flat_section() {
        let s = section(vec![0.1; 4], vec![1.0, 2.0], 2);
        assert!(matches!(section_levels(&s, 0.15), Err(RenderError::NoData(_))));

        let s = section(vec![f32::NAN; 4], vec![1.0, 2.0], 2);
        assert!(matches!(section_levels(&s, 0.15), Err(RenderError::NoData(_))));

        let s = section(vec![1.0; 4], vec![1.0, 2.0], 2);
        assert!(section_levels(&s, 0.0).is_err());
    }

    #[test]
    fn test_path_axis_falls_back_to_steps() {
        let mut s = section(vec![0.0; 6], vec![1.0, 2.0], 3);
        s.points = vec![GeoPoint::new(30.0, -66.0); 3];
        s.end = GeoPoint::new(40.0, -70.0);
        let (label, axis) = path_axis(&s).unwrap();
        assert_eq!(label, "Step");
        assert_eq!(axis.values(), &[0.0, 1.0, 2.0]);
    }

    #[test]
    fn test_single_layer_is_rejected() {
        let s = section(vec![0.0, 1.0, 2.0], vec![1.0], 3);
        let style = PlotStyle {
            dpi: 20.0,
            ..PlotStyle::default()
        };
        let result = render_cross_section(
            &s,
            &crate::colormap::create_custom_colormap().unwrap().cmap,
            &style,
            &SectionOptions::default(),
        );
        assert!(matches!(result, Err(RenderError::NoData(_))));
    }
}
