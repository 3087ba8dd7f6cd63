//! Text drawing with the embedded font.

use image::{imageops, Rgba, RgbaImage};
use imageproc::drawing::draw_text_mut;
use rusttype::{point, Font, Scale};

use crate::colormap::Color;
use crate::error::{RenderError, RenderResult};

/// Embedded font data - DejaVu Sans Mono (a clean, readable monospace font)
const FONT_DATA: &[u8] = include_bytes!("../assets/DejaVuSansMono.ttf");

/// Parse the embedded font.
pub fn load_font() -> RenderResult<Font<'static>> {
    Font::try_from_bytes(FONT_DATA).ok_or(RenderError::Font)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VAlign {
    Top,
    Center,
    Bottom,
}

/// Width and height in pixels of `text` set at `size_px`.
pub fn text_extent(font: &Font, text: &str, size_px: f32) -> (f32, f32) {
    let scale = Scale::uniform(size_px);
    let v = font.v_metrics(scale);
    let width = font
        .layout(text, scale, point(0.0, v.ascent))
        .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
        .fold(0.0f32, f32::max);
    (width, v.ascent - v.descent)
}

fn aligned_origin(x: f32, y: f32, w: f32, h: f32, halign: HAlign, valign: VAlign) -> (i32, i32) {
    let left = match halign {
        HAlign::Left => x,
        HAlign::Center => x - w / 2.0,
        HAlign::Right => x - w,
    };
    let top = match valign {
        VAlign::Top => y,
        VAlign::Center => y - h / 2.0,
        VAlign::Bottom => y - h,
    };
    (left.round() as i32, top.round() as i32)
}

/// Draw horizontal text anchored at (x, y).
#[allow(clippy::too_many_arguments)]
pub fn draw_text(
    img: &mut RgbaImage,
    font: &Font,
    text: &str,
    x: f32,
    y: f32,
    size_px: f32,
    color: Color,
    halign: HAlign,
    valign: VAlign,
) {
    let (w, h) = text_extent(font, text, size_px);
    let (left, top) = aligned_origin(x, y, w, h, halign, valign);
    draw_text_mut(
        img,
        Rgba(color.to_rgba()),
        left,
        top,
        Scale::uniform(size_px),
        font,
        text,
    );
}

/// Draw text rotated 90 degrees counter-clockwise (reading bottom to top),
/// centred on (x, y).
pub fn draw_text_vertical(
    img: &mut RgbaImage,
    font: &Font,
    text: &str,
    x: f32,
    y: f32,
    size_px: f32,
    color: Color,
) {
    let (w, h) = text_extent(font, text, size_px);
    let (tw, th) = (w.ceil().max(1.0) as u32, h.ceil().max(1.0) as u32);

    let mut label = RgbaImage::from_pixel(tw, th, Rgba([0, 0, 0, 0]));
    draw_text_mut(
        &mut label,
        Rgba(color.to_rgba()),
        0,
        0,
        Scale::uniform(size_px),
        font,
        text,
    );
    let rotated = imageops::rotate270(&label);

    let left = (x - th as f32 / 2.0).round() as i64;
    let top = (y - tw as f32 / 2.0).round() as i64;
    imageops::overlay(img, &rotated, left, top);
}
