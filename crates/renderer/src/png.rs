//! PNG encoding for finished plots.
//!
//! Plots with at most 256 distinct colours are written as indexed PNG
//! (colour type 3), everything else as 8-bit RGBA (colour type 6). Every
//! file carries a `pHYs` chunk so viewers and print tools see the DPI.

use std::collections::HashMap;
use std::io::Write;
use std::path::Path;

use image::RgbaImage;
use rayon::prelude::*;
use tracing::info;

use crate::error::{RenderError, RenderResult};

const SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// Maximum colors for indexed PNG (PNG8)
const MAX_PALETTE_SIZE: usize = 256;

/// Minimum pixels to benefit from parallel palette extraction
const PARALLEL_THRESHOLD: usize = 4096;

const INCHES_PER_METER: f64 = 1.0 / 0.0254;

type Palette = Vec<[u8; 4]>;

#[inline(always)]
fn pack(p: &[u8]) -> u32 {
    u32::from_le_bytes([p[0], p[1], p[2], p[3]])
}

/// Palette and per-pixel indices, or `None` past 256 colours.
fn extract_palette(pixels: &[u8]) -> Option<(Palette, Vec<u8>)> {
    let num_pixels = pixels.len() / 4;

    let unique: Vec<u32> = if num_pixels >= PARALLEL_THRESHOLD {
        let chunk = (num_pixels / rayon::current_num_threads()).max(256) * 4;
        pixels
            .par_chunks(chunk)
            .flat_map_iter(|part| {
                let mut seen: HashMap<u32, ()> = HashMap::with_capacity(MAX_PALETTE_SIZE);
                for p in part.chunks_exact(4) {
                    seen.insert(pack(p), ());
                    if seen.len() > MAX_PALETTE_SIZE {
                        break;
                    }
                }
                seen.into_keys()
            })
            .collect()
    } else {
        pixels.chunks_exact(4).map(pack).collect()
    };

    let mut index_of: HashMap<u32, u8> = HashMap::with_capacity(MAX_PALETTE_SIZE);
    let mut palette = Palette::with_capacity(MAX_PALETTE_SIZE);
    for packed in unique {
        if index_of.contains_key(&packed) {
            continue;
        }
        if palette.len() >= MAX_PALETTE_SIZE {
            return None;
        }
        index_of.insert(packed, palette.len() as u8);
        palette.push(packed.to_le_bytes());
    }

    let indices = pixels
        .par_chunks(4)
        .map(|p| index_of.get(&pack(p)).copied().unwrap_or(0))
        .collect();
    Some((palette, indices))
}

fn write_chunk(png: &mut Vec<u8>, chunk_type: &[u8; 4], data: &[u8]) {
    png.extend_from_slice(&(data.len() as u32).to_be_bytes());
    png.extend_from_slice(chunk_type);
    png.extend_from_slice(data);

    let mut hasher = crc32fast::Hasher::new();
    hasher.update(chunk_type);
    hasher.update(data);
    png.extend_from_slice(&hasher.finalize().to_be_bytes());
}

fn ihdr(width: usize, height: usize, color_type: u8) -> Vec<u8> {
    let mut data = Vec::with_capacity(13);
    data.extend_from_slice(&(width as u32).to_be_bytes());
    data.extend_from_slice(&(height as u32).to_be_bytes());
    data.push(8); // bit depth
    data.push(color_type);
    data.push(0); // compression method
    data.push(0); // filter method
    data.push(0); // interlace method
    data
}

/// `pHYs` payload: pixels per metre on both axes, unit = metre.
fn phys(dpi: f32) -> Vec<u8> {
    let ppm = (dpi as f64 * INCHES_PER_METER).round() as u32;
    let mut data = Vec::with_capacity(9);
    data.extend_from_slice(&ppm.to_be_bytes());
    data.extend_from_slice(&ppm.to_be_bytes());
    data.push(1);
    data
}

/// Zlib-compress scanlines of `row_len` bytes, each prefixed with filter 0.
fn deflate_rows(data: &[u8], row_len: usize, height: usize) -> RenderResult<Vec<u8>> {
    let mut raw = Vec::with_capacity(height * (row_len + 1));
    for row in data.chunks_exact(row_len).take(height) {
        raw.push(0);
        raw.extend_from_slice(row);
    }
    let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::fast());
    encoder
        .write_all(&raw)
        .map_err(|e| RenderError::Encode(format!("IDAT compression failed: {}", e)))?;
    encoder
        .finish()
        .map_err(|e| RenderError::Encode(format!("IDAT compression failed: {}", e)))
}

/// Encode straight-alpha RGBA pixels, choosing indexed output when the
/// colours fit in a palette. `dpi` adds a `pHYs` chunk.
pub fn encode_png(pixels: &[u8], width: usize, height: usize, dpi: Option<f32>) -> RenderResult<Vec<u8>> {
    if width == 0 || height == 0 || pixels.len() != width * height * 4 {
        return Err(RenderError::Encode(format!(
            "{} bytes cannot be a {}x{} RGBA image",
            pixels.len(),
            width,
            height
        )));
    }

    let mut png = Vec::new();
    png.extend_from_slice(&SIGNATURE);

    match extract_palette(pixels) {
        Some((palette, indices)) => {
            write_chunk(&mut png, b"IHDR", &ihdr(width, height, 3));
            if let Some(dpi) = dpi {
                write_chunk(&mut png, b"pHYs", &phys(dpi));
            }
            let plte: Vec<u8> = palette.iter().flat_map(|c| [c[0], c[1], c[2]]).collect();
            write_chunk(&mut png, b"PLTE", &plte);
            if palette.iter().any(|c| c[3] < 255) {
                let trns: Vec<u8> = palette.iter().map(|c| c[3]).collect();
                write_chunk(&mut png, b"tRNS", &trns);
            }
            write_chunk(&mut png, b"IDAT", &deflate_rows(&indices, width, height)?);
        }
        None => {
            write_chunk(&mut png, b"IHDR", &ihdr(width, height, 6));
            if let Some(dpi) = dpi {
                write_chunk(&mut png, b"pHYs", &phys(dpi));
            }
            write_chunk(&mut png, b"IDAT", &deflate_rows(pixels, width * 4, height)?);
        }
    }

    write_chunk(&mut png, b"IEND", &[]);
    Ok(png)
}

/// Encode a finished plot and write it to `path`, replacing any existing file.
pub fn save_png(img: &RgbaImage, path: &Path, dpi: f32) -> RenderResult<()> {
    let (width, height) = img.dimensions();
    let bytes = encode_png(img.as_raw(), width as usize, height as usize, Some(dpi))?;
    std::fs::write(path, &bytes)?;
    info!(
        path = %path.display(),
        width = width,
        height = height,
        dpi = dpi,
        bytes = bytes.len(),
        "Saved plot"
    );
    Ok(())
}
