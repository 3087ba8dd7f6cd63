//! Tests for PNG encoding of finished plots.

use renderer::png::{encode_png, save_png};
use image::{Rgba, RgbaImage};

/// Walk the chunk list of an encoded PNG.
fn chunk_types(png: &[u8]) -> Vec<String> {
    let mut types = Vec::new();
    let mut pos = 8;
    while pos + 8 <= png.len() {
        let len = u32::from_be_bytes([png[pos], png[pos + 1], png[pos + 2], png[pos + 3]]) as usize;
        types.push(String::from_utf8_lossy(&png[pos + 4..pos + 8]).into_owned());
        pos += 12 + len;
    }
    types
}

fn banded_pixels(width: usize, height: usize, bands: usize) -> Vec<u8> {
    let mut pixels = Vec::with_capacity(width * height * 4);
    for _ in 0..height {
        for x in 0..width {
            let band = (x * bands / width) as u8;
            pixels.extend_from_slice(&[band, 255 - band, 128, 255]);
        }
    }
    pixels
}

#[test]
fn test_few_colors_give_indexed_png() {
    let png = encode_png(&banded_pixels(64, 32, 60), 64, 32, Some(600.0)).unwrap();
    assert_eq!(&png[..8], &[137, 80, 78, 71, 13, 10, 26, 10]);
    // Colour type lives at byte 25 (8 signature + 8 chunk header + 9).
    assert_eq!(png[25], 3);
    assert_eq!(
        chunk_types(&png),
        vec!["IHDR", "pHYs", "PLTE", "IDAT", "IEND"]
    );
}

#[test]
fn test_many_colors_give_rgba_png() {
    let pixels: Vec<u8> = (0..64 * 64u32)
        .flat_map(|i| [(i % 256) as u8, (i / 256) as u8, 7, 255])
        .collect();
    let png = encode_png(&pixels, 64, 64, None).unwrap();
    assert_eq!(png[25], 6);
    assert_eq!(chunk_types(&png), vec!["IHDR", "IDAT", "IEND"]);
}

#[test]
fn test_save_png_decodes_back() {
    let dir = test_utils::temp_test_dir();
    let path = dir.path().join("plot.png");
    let mut img = RgbaImage::from_pixel(40, 20, Rgba([255, 255, 255, 255]));
    img.put_pixel(3, 4, Rgba([255, 0, 0, 255]));

    save_png(&img, &path, 600.0).unwrap();

    let decoded = image::open(&path).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (40, 20));
    assert_eq!(decoded.get_pixel(3, 4), &Rgba([255, 0, 0, 255]));
    assert_eq!(decoded.get_pixel(0, 0), &Rgba([255, 255, 255, 255]));
}

#[test]
fn test_save_png_overwrites() {
    let dir = test_utils::temp_test_dir();
    let path = dir.path().join("plot.png");
    std::fs::write(&path, b"stale").unwrap();

    let img = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255]));
    save_png(&img, &path, 72.0).unwrap();

    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(&bytes[1..4], b"PNG");
}
