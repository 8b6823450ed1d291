//! Synthetic image fixtures.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::{Rgb, RgbImage};

pub mod colors {
    pub const BRICK: [u8; 3] = [120, 60, 60];
    pub const CLAY: [u8; 3] = [130, 70, 70];
    pub const RED: [u8; 3] = [255, 0, 0];
    pub const DARK_RED: [u8; 3] = [139, 0, 0];
    pub const NAVY: [u8; 3] = [0, 0, 128];
    pub const WHITE: [u8; 3] = [255, 255, 255];
}

/// Horizontal bands of solid color, `rows` rows each
pub fn bands(width: u32, bands: &[([u8; 3], u32)]) -> RgbImage {
    let height = bands.iter().map(|(_, rows)| rows).sum();
    RgbImage::from_fn(width, height, |_, y| {
        let mut start = 0;
        for (color, rows) in bands {
            if y < start + rows {
                return Rgb(*color);
            }
            start += rows;
        }
        Rgb([0, 0, 0])
    })
}

/// 5x5 image: three rows of one color, two rows of another (60% / 40%)
pub fn sixty_forty(top: [u8; 3], bottom: [u8; 3]) -> RgbImage {
    bands(5, &[(top, 3), (bottom, 2)])
}

pub fn solid(width: u32, height: u32, color: [u8; 3]) -> RgbImage {
    RgbImage::from_pixel(width, height, Rgb(color))
}

/// Encode an image as PNG bytes
pub fn png_bytes(image: &RgbImage) -> Vec<u8> {
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .expect("encode PNG");
    bytes
}

/// Write an image as PNG into `dir`
pub fn write_png(dir: &Path, name: &str, image: &RgbImage) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, png_bytes(image)).expect("write PNG");
    path
}
