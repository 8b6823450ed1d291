//! Pixel buffer owned by one extraction or validation call.
//!
//! Every input is normalised to 3-channel RGB on construction: grayscale
//! sources are broadcast to three identical channels and alpha is dropped.

use image::imageops::FilterType;
use image::{DynamicImage, ImageError, RgbImage};

/// A 2-D grid of RGB triples (0..=255 per channel).
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    image: RgbImage,
}

impl PixelBuffer {
    /// Decode a standard raster payload (PNG, JPEG, ...) into a buffer.
    pub fn decode(bytes: &[u8]) -> Result<Self, ImageError> {
        let image = image::load_from_memory(bytes)?;
        Ok(Self::from_dynamic(&image))
    }

    /// Normalise any decoded image to RGB.
    pub fn from_dynamic(image: &DynamicImage) -> Self {
        Self {
            image: image.to_rgb8(),
        }
    }

    pub fn from_rgb_image(image: RgbImage) -> Self {
        Self { image }
    }

    /// Build a buffer from row-major RGB triples.
    ///
    /// Returns `None` if `pixels.len() != width * height`.
    pub fn from_pixels(width: u32, height: u32, pixels: &[[u8; 3]]) -> Option<Self> {
        if pixels.len() != (width as usize) * (height as usize) {
            return None;
        }
        let raw: Vec<u8> = pixels.iter().flat_map(|p| p.iter().copied()).collect();
        RgbImage::from_raw(width, height, raw).map(Self::from_rgb_image)
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn pixel_count(&self) -> usize {
        (self.width() as usize) * (self.height() as usize)
    }

    pub fn is_empty(&self) -> bool {
        self.pixel_count() == 0
    }

    pub fn as_rgb_image(&self) -> &RgbImage {
        &self.image
    }

    /// Dimensions after the optional downscale applied before clustering.
    ///
    /// If either side exceeds `max_size`, the longest side is brought down to
    /// `max_size` and the other side follows the aspect ratio (minimum 1).
    pub fn scaled_dimensions(&self, max_size: u32) -> (u32, u32) {
        let (w, h) = (self.width(), self.height());
        if max_size == 0 || (w <= max_size && h <= max_size) {
            return (w, h);
        }
        let ratio = max_size as f64 / w.max(h) as f64;
        let nw = ((w as f64) * ratio).round().max(1.0) as u32;
        let nh = ((h as f64) * ratio).round().max(1.0) as u32;
        (nw.min(max_size), nh.min(max_size))
    }

    /// Flat list of color vectors (0.0..=255.0 per channel) after the
    /// optional downscale.
    ///
    /// Nearest-neighbour sampling keeps the original colors, so only the
    /// color distribution matters, not the exact pixel count.
    pub fn color_points(&self, max_size: u32) -> Vec<[f32; 3]> {
        let (nw, nh) = self.scaled_dimensions(max_size);
        if (nw, nh) == (self.width(), self.height()) {
            return to_points(&self.image);
        }
        let resized = image::imageops::resize(&self.image, nw, nh, FilterType::Nearest);
        to_points(&resized)
    }
}

fn to_points(image: &RgbImage) -> Vec<[f32; 3]> {
    image
        .pixels()
        .map(|p| [p[0] as f32, p[1] as f32, p[2] as f32])
        .collect()
}
