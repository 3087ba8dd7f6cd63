//! Filled-contour rasterization.
//!
//! Every output pixel samples the data at its centre and takes the colour of
//! the band that contains the value. Pixels whose value is NaN or outside
//! a non-extended level range stay transparent.

use rayon::prelude::*;

use crate::colormap::DiscreteColormap;

/// Rasterize filled contours into straight-alpha RGBA bytes.
///
/// `sample(col, row)` returns the data value at the centre of that pixel.
/// Rows are rendered in parallel.
pub fn fill_contours<F>(width: u32, height: u32, colormap: &DiscreteColormap, sample: F) -> Vec<u8>
where
    F: Fn(u32, u32) -> f32 + Sync,
{
    let row_bytes = width as usize * 4;
    let mut pixels = vec![0u8; row_bytes * height as usize];
    if row_bytes == 0 {
        return pixels;
    }

    pixels
        .par_chunks_mut(row_bytes)
        .enumerate()
        .for_each(|(row, out)| {
            for col in 0..width {
                let value = sample(col, row as u32);
                if let Some(color) = colormap.color(value as f64) {
                    let i = col as usize * 4;
                    out[i..i + 4].copy_from_slice(&color.to_rgba());
                }
            }
        });

    let filled = pixels.chunks_exact(4).filter(|p| p[3] > 0).count();
    tracing::debug!(
        width = width,
        height = height,
        bands = colormap.norm.n_bins(),
        filled_pixels = filled,
        "Rasterized filled contours"
    );

    pixels
}
