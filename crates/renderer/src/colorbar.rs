//! Colorbars for discrete colormaps.
//!
//! Bands are drawn with equal size, one per interval of the norm's
//! boundaries, with triangular extensions at both ends in the colormap's
//! under and over colours.

use crate::axes::{format_tick, nice_step, nice_ticks};
use crate::colormap::{Color, DiscreteColormap};
use crate::figure::{Figure, LineStyle, PxRect};
use crate::text::{HAlign, VAlign};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// Length of each end triangle relative to the bar's interior length.
const EXTEND_FRACTION: f32 = 0.05;

/// Draw a colorbar whose interior (without the end triangles) fills `rect`.
///
/// Tick labels and `label` are placed below a horizontal bar and to the
/// right of a vertical one.
pub fn draw_colorbar(
    fig: &mut Figure,
    rect: PxRect,
    colormap: &DiscreteColormap,
    orientation: Orientation,
    label: &str,
    font_px: f32,
) {
    let boundaries = colormap.norm.boundaries();
    let colors = colormap.cmap.colors();
    let n = colors.len().min(boundaries.len() - 1);
    if n == 0 {
        return;
    }
    let (vmin, vmax) = (boundaries[0], boundaries[n]);
    let outline = LineStyle::solid(Color::BLACK, (font_px / 35.0).max(1.0));

    // Position of a data value along the bar, in pixels from its start.
    let along = |value: f64| -> f32 {
        let len = match orientation {
            Orientation::Horizontal => rect.w,
            Orientation::Vertical => rect.h,
        };
        let band = boundaries[..=n].partition_point(|&b| b <= value).clamp(1, n) - 1;
        let frac = (value - boundaries[band]) / (boundaries[band + 1] - boundaries[band]);
        len * ((band as f64 + frac.clamp(0.0, 1.0)) / n as f64) as f32
    };

    for (i, color) in colors.iter().take(n).enumerate() {
        let band = match orientation {
            Orientation::Horizontal => {
                let x0 = rect.x + along(boundaries[i]);
                let x1 = rect.x + along(boundaries[i + 1]);
                PxRect::new(x0, rect.y, (x1 - x0).max(1.0), rect.h)
            }
            Orientation::Vertical => {
                let y0 = rect.bottom() - along(boundaries[i + 1]);
                let y1 = rect.bottom() - along(boundaries[i]);
                PxRect::new(rect.x, y0, rect.w, (y1 - y0).max(1.0))
            }
        };
        fig.fill_rect(band, *color);
    }

    let under = colormap.cmap.under_or_first();
    let over = colormap.cmap.over_or_last();
    let (low_tri, high_tri) = match orientation {
        Orientation::Horizontal => {
            let ext = rect.w * EXTEND_FRACTION;
            (
                vec![(rect.x, rect.y), (rect.x - ext, rect.center_y()), (rect.x, rect.bottom())],
                vec![
                    (rect.right(), rect.y),
                    (rect.right() + ext, rect.center_y()),
                    (rect.right(), rect.bottom()),
                ],
            )
        }
        Orientation::Vertical => {
            let ext = rect.h * EXTEND_FRACTION;
            (
                vec![
                    (rect.x, rect.bottom()),
                    (rect.center_x(), rect.bottom() + ext),
                    (rect.right(), rect.bottom()),
                ],
                vec![(rect.x, rect.y), (rect.center_x(), rect.y - ext), (rect.right(), rect.y)],
            )
        }
    };
    for (tri, color) in [(&low_tri, under), (&high_tri, over)] {
        fig.fill_polygon(tri, color);
        let mut closed = tri.clone();
        closed.push(tri[0]);
        fig.polyline(&closed, &outline);
    }
    fig.stroke_rect(rect, &outline);

    let step = nice_step(vmax - vmin, 6);
    let tick_len = font_px * 0.3;
    for tick in nice_ticks(vmin, vmax, 6) {
        let text = format_tick(tick, step);
        match orientation {
            Orientation::Horizontal => {
                let x = rect.x + along(tick);
                fig.line((x, rect.bottom()), (x, rect.bottom() + tick_len), &outline);
                fig.text(
                    text,
                    x,
                    rect.bottom() + tick_len * 1.5,
                    font_px,
                    Color::BLACK,
                    HAlign::Center,
                    VAlign::Top,
                );
            }
            Orientation::Vertical => {
                let y = rect.bottom() - along(tick);
                fig.line((rect.right(), y), (rect.right() + tick_len, y), &outline);
                fig.text(
                    text,
                    rect.right() + tick_len * 1.5,
                    y,
                    font_px,
                    Color::BLACK,
                    HAlign::Left,
                    VAlign::Center,
                );
            }
        }
    }

    match orientation {
        Orientation::Horizontal => fig.text(
            label,
            rect.center_x(),
            rect.bottom() + tick_len * 2.0 + font_px * 1.5,
            font_px,
            Color::BLACK,
            HAlign::Center,
            VAlign::Top,
        ),
        Orientation::Vertical => {
            let widest = nice_ticks(vmin, vmax, 6)
                .iter()
                .map(|t| format_tick(*t, step).chars().count())
                .max()
                .unwrap_or(1) as f32;
            let x = rect.right() + tick_len * 2.0 + widest * font_px * 0.62 + font_px;
            fig.vertical_text(label, x, rect.center_y(), font_px, Color::BLACK);
        }
    }
}
