//! Filled-contour map of a gridded field on a Plate Carrée background.

use case_common::{BoundingBox, GeoPoint, GriddedField};
use cross_section::{sample_field, InterpolationMethod};
use image::RgbaImage;
use projection::PlateCarree;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::axes::{format_latitude, format_longitude, nice_ticks};
use crate::colorbar::{draw_colorbar, Orientation};
use crate::colormap::{Color, DiscreteColormap};
use crate::contour::fill_contours;
use crate::error::{RenderError, RenderResult};
use crate::figure::{Figure, LineStyle, PxRect};
use crate::style::PlotStyle;
use crate::text::{HAlign, VAlign};

/// Map area and decorations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapOptions {
    /// `[lon_min, lon_max, lat_min, lat_max]` in degrees.
    pub extent: [f64; 4],
    /// Dashed labelled gridlines.
    pub gridlines: bool,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            extent: [-100.0, 10.0, 10.0, 45.0],
            gridlines: true,
        }
    }
}

/// Aspect of the colorbar (length / thickness) and its share of the map width.
const COLORBAR_ASPECT: f32 = 25.0;
const COLORBAR_SHRINK: f32 = 0.9;
const COLORBAR_PAD: f32 = 0.05;

/// Pixel rectangles of the map and its colorbar.
#[derive(Debug, Clone, Copy, PartialEq)]
struct MapLayout {
    map: PxRect,
    colorbar: PxRect,
}

fn layout(style: &PlotStyle, extent: &BoundingBox) -> RenderResult<MapLayout> {
    if !extent.is_valid() {
        return Err(RenderError::InvalidCanvas(format!("map extent {:?} is empty", extent)));
    }
    let (fw, fh) = style.pixel_size();
    let (fw, fh) = (fw as f32, fh as f32);
    let font = style.font_px();
    let pad = font;

    let left = pad + font * 0.62 * 5.0 + font * 0.5;
    let right = pad + font * 1.5;
    let below_map = font * 1.6;
    // Tick marks, tick labels and the label under the bar.
    let below_bar = font * 0.45 + font * 1.1 + font * 1.6 + pad;

    let aspect = (extent.width() / extent.height()) as f32;
    let avail_w = fw - left - right;
    let bar_share = COLORBAR_SHRINK / COLORBAR_ASPECT;

    let mut mw = avail_w;
    let mut mh = mw / aspect;
    let needed = pad + mh * (1.0 + COLORBAR_PAD) + below_map + mw * bar_share + below_bar;
    if needed > fh {
        mh = (fh - pad - below_map - below_bar) / (1.0 + COLORBAR_PAD + aspect * bar_share);
        mw = mh * aspect;
    }
    if mw < 1.0 || mh < 1.0 {
        return Err(RenderError::InvalidCanvas(format!(
            "a {}x{} figure leaves no room for the map at font size {}",
            fw, fh, style.font_size
        )));
    }

    let map = PxRect::new(
        (left + (avail_w - mw) / 2.0).floor(),
        pad.floor(),
        mw.floor(),
        mh.floor(),
    );
    let bar_len = map.w * COLORBAR_SHRINK;
    let colorbar = PxRect::new(
        map.x + (map.w - bar_len) / 2.0,
        map.bottom() + below_map + map.h * COLORBAR_PAD,
        bar_len,
        bar_len / COLORBAR_ASPECT,
    );
    Ok(MapLayout { map, colorbar })
}

/// Render `field` as filled contours on a Plate Carrée map with the transect
/// from `start` to `end` drawn as a red line with end markers.
pub fn render_moisture_map(
    field: &GriddedField,
    start: GeoPoint,
    end: GeoPoint,
    colormap: &DiscreteColormap,
    style: &PlotStyle,
    options: &MapOptions,
) -> RenderResult<RgbaImage> {
    let extent = BoundingBox::from_extent(options.extent);
    let (fw, fh) = style.pixel_size();
    let mut fig = Figure::new(fw, fh)?;
    let MapLayout { map, colorbar } = layout(style, &extent)?;
    let (mw, mh) = (map.w as u32, map.h as u32);
    let proj = PlateCarree::new(extent, mw, mh)?;
    let font = style.font_px();

    let pixels = fill_contours(mw, mh, &colormap.unextended(), |col, row| {
        sample_field(field, proj.pixel_center(col, row), InterpolationMethod::Bilinear)
    });
    fig.draw_rgba(map.x as i32, map.y as i32, mw, mh, &pixels)?;

    let to_fig = |p: GeoPoint| {
        let (x, y) = proj.to_pixel(p);
        (map.x + x as f32, map.y + y as f32)
    };

    if options.gridlines {
        let grid_style = LineStyle::dashed(
            Color::GRAY.with_alpha(128),
            style.pt(1.0),
            vec![style.pt(3.7), style.pt(1.6)],
        );
        for lon in nice_ticks(extent.min_x, extent.max_x, 6) {
            let (x, _) = to_fig(GeoPoint::new(extent.min_y, lon));
            fig.line((x, map.y), (x, map.bottom()), &grid_style);
            fig.text(
                format_longitude(lon),
                x,
                map.bottom() + font * 0.3,
                font,
                Color::BLACK,
                HAlign::Center,
                VAlign::Top,
            );
        }
        for lat in nice_ticks(extent.min_y, extent.max_y, 4) {
            let (_, y) = to_fig(GeoPoint::new(lat, extent.min_x));
            fig.line((map.x, y), (map.right(), y), &grid_style);
            fig.text(
                format_latitude(lat),
                map.x - font * 0.3,
                y,
                font,
                Color::BLACK,
                HAlign::Right,
                VAlign::Center,
            );
        }
    }

    fig.stroke_rect(map, &LineStyle::solid(Color::BLACK, style.pt(1.0)));

    let (x0, y0) = to_fig(start);
    let (x1, y1) = to_fig(end);
    fig.line(
        (x0, y0),
        (x1, y1),
        &LineStyle::solid(Color::RED, style.pt(style.line_width)),
    );
    for (x, y) in [(x0, y0), (x1, y1)] {
        fig.fill_circle(x, y, style.pt(3.0), Color::RED);
    }

    draw_colorbar(
        &mut fig,
        colorbar,
        colormap,
        Orientation::Horizontal,
        &style.colorbar_label,
        font,
    );

    let img = fig.finish()?;
    info!(
        variable = %field.name,
        width = img.width(),
        height = img.height(),
        map_width = mw,
        map_height = mh,
        "Rendered moisture map"
    );
    Ok(img)
}
