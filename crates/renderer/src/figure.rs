//! A raster figure: shapes are drawn with tiny-skia, text is queued and
//! stamped on top with the embedded font when the figure is finished.

use image::RgbaImage;
use tiny_skia::{
    FillRule, IntSize, LineCap, LineJoin, Paint, PathBuilder, Pixmap, PixmapPaint, Rect, Stroke,
    StrokeDash, Transform,
};

use crate::colormap::Color;
use crate::error::{RenderError, RenderResult};
use crate::text::{draw_text, draw_text_vertical, load_font, HAlign, VAlign};

/// A pixel rectangle: top-left corner plus size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PxRect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl PxRect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.w / 2.0
    }

    pub fn center_y(&self) -> f32 {
        self.y + self.h / 2.0
    }
}

#[derive(Debug, Clone)]
enum TextItem {
    Horizontal {
        text: String,
        x: f32,
        y: f32,
        size_px: f32,
        color: Color,
        halign: HAlign,
        valign: VAlign,
    },
    Vertical {
        text: String,
        x: f32,
        y: f32,
        size_px: f32,
        color: Color,
    },
}

/// Line appearance.
#[derive(Debug, Clone, PartialEq)]
pub struct LineStyle {
    pub color: Color,
    pub width_px: f32,
    /// Dash pattern (on, off, ...) in pixels; `None` for a solid line.
    pub dash: Option<Vec<f32>>,
}

impl LineStyle {
    pub fn solid(color: Color, width_px: f32) -> Self {
        Self {
            color,
            width_px,
            dash: None,
        }
    }

    pub fn dashed(color: Color, width_px: f32, dash: Vec<f32>) -> Self {
        Self {
            color,
            width_px,
            dash: Some(dash),
        }
    }
}

fn paint_for(color: Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, color.a);
    paint.anti_alias = true;
    paint
}

/// A white canvas of fixed pixel size.
pub struct Figure {
    pixmap: Pixmap,
    texts: Vec<TextItem>,
}

impl Figure {
    pub fn new(width: u32, height: u32) -> RenderResult<Self> {
        let mut pixmap = Pixmap::new(width, height).ok_or_else(|| {
            RenderError::InvalidCanvas(format!("cannot allocate a {}x{} canvas", width, height))
        })?;
        pixmap.fill(tiny_skia::Color::WHITE);
        Ok(Self {
            pixmap,
            texts: Vec::new(),
        })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Composite straight-alpha RGBA pixels with their top-left at (x, y).
    pub fn draw_rgba(&mut self, x: i32, y: i32, width: u32, height: u32, rgba: &[u8]) -> RenderResult<()> {
        let size = IntSize::from_wh(width, height).ok_or_else(|| {
            RenderError::InvalidCanvas(format!("empty layer {}x{}", width, height))
        })?;
        let premultiplied: Vec<u8> = rgba
            .chunks_exact(4)
            .flat_map(|p| {
                let a = p[3] as u16;
                let mul = |c: u8| ((c as u16 * a + 127) / 255) as u8;
                [mul(p[0]), mul(p[1]), mul(p[2]), p[3]]
            })
            .collect();
        let layer = Pixmap::from_vec(premultiplied, size).ok_or_else(|| {
            RenderError::InvalidCanvas(format!(
                "layer of {} bytes does not match {}x{}",
                rgba.len(),
                width,
                height
            ))
        })?;
        self.pixmap.draw_pixmap(
            x,
            y,
            layer.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );
        Ok(())
    }

    /// Stroke an open polyline.
    pub fn polyline(&mut self, points: &[(f32, f32)], style: &LineStyle) {
        if points.len() < 2 {
            return;
        }
        let mut pb = PathBuilder::new();
        pb.move_to(points[0].0, points[0].1);
        for &(x, y) in &points[1..] {
            pb.line_to(x, y);
        }
        let Some(path) = pb.finish() else {
            return;
        };

        let mut stroke = Stroke {
            width: style.width_px,
            line_cap: LineCap::Butt,
            line_join: LineJoin::Round,
            ..Stroke::default()
        };
        if let Some(dash) = &style.dash {
            stroke.dash = StrokeDash::new(dash.clone(), 0.0);
        }
        self.pixmap.stroke_path(
            &path,
            &paint_for(style.color),
            &stroke,
            Transform::identity(),
            None,
        );
    }

    pub fn line(&mut self, from: (f32, f32), to: (f32, f32), style: &LineStyle) {
        self.polyline(&[from, to], style);
    }

    pub fn fill_rect(&mut self, rect: PxRect, color: Color) {
        if let Some(r) = Rect::from_xywh(rect.x, rect.y, rect.w, rect.h) {
            self.pixmap
                .fill_rect(r, &paint_for(color), Transform::identity(), None);
        }
    }

    pub fn stroke_rect(&mut self, rect: PxRect, style: &LineStyle) {
        let corners = [
            (rect.x, rect.y),
            (rect.right(), rect.y),
            (rect.right(), rect.bottom()),
            (rect.x, rect.bottom()),
            (rect.x, rect.y),
        ];
        self.polyline(&corners, style);
    }

    /// Fill a closed polygon.
    pub fn fill_polygon(&mut self, points: &[(f32, f32)], color: Color) {
        if points.len() < 3 {
            return;
        }
        let mut pb = PathBuilder::new();
        pb.move_to(points[0].0, points[0].1);
        for &(x, y) in &points[1..] {
            pb.line_to(x, y);
        }
        pb.close();
        if let Some(path) = pb.finish() {
            self.pixmap.fill_path(
                &path,
                &paint_for(color),
                FillRule::Winding,
                Transform::identity(),
                None,
            );
        }
    }

    pub fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Color) {
        if let Some(path) = PathBuilder::from_circle(cx, cy, radius) {
            self.pixmap.fill_path(
                &path,
                &paint_for(color),
                FillRule::Winding,
                Transform::identity(),
                None,
            );
        }
    }

    /// Queue horizontal text anchored at (x, y).
    #[allow(clippy::too_many_arguments)]
    pub fn text(
        &mut self,
        text: impl Into<String>,
        x: f32,
        y: f32,
        size_px: f32,
        color: Color,
        halign: HAlign,
        valign: VAlign,
    ) {
        self.texts.push(TextItem::Horizontal {
            text: text.into(),
            x,
            y,
            size_px,
            color,
            halign,
            valign,
        });
    }

    /// Queue text reading bottom to top, centred on (x, y).
    pub fn vertical_text(&mut self, text: impl Into<String>, x: f32, y: f32, size_px: f32, color: Color) {
        self.texts.push(TextItem::Vertical {
            text: text.into(),
            x,
            y,
            size_px,
            color,
        });
    }

    /// Flatten shapes to an RGBA image and stamp the queued text on top.
    pub fn finish(self) -> RenderResult<RgbaImage> {
        let (width, height) = (self.pixmap.width(), self.pixmap.height());
        let rgba: Vec<u8> = self
            .pixmap
            .pixels()
            .iter()
            .flat_map(|p| {
                let c = p.demultiply();
                [c.red(), c.green(), c.blue(), c.alpha()]
            })
            .collect();
        let mut img = RgbaImage::from_raw(width, height, rgba).ok_or_else(|| {
            RenderError::InvalidCanvas(format!("pixel buffer does not match {}x{}", width, height))
        })?;

        if self.texts.is_empty() {
            return Ok(img);
        }
        let font = load_font()?;
        for item in &self.texts {
            match item {
                TextItem::Horizontal {
                    text,
                    x,
                    y,
                    size_px,
                    color,
                    halign,
                    valign,
                } => draw_text(&mut img, &font, text, *x, *y, *size_px, *color, *halign, *valign),
                TextItem::Vertical {
                    text,
                    x,
                    y,
                    size_px,
                    color,
                } => draw_text_vertical(&mut img, &font, text, *x, *y, *size_px, *color),
            }
        }
        Ok(img)
    }
}
