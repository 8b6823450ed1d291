//! Dominant color extraction.
//!
//! Pixels are (optionally) downscaled, clustered into `k` groups with
//! k-means, and each non-empty cluster becomes a [`ColorEntry`] whose
//! percentage is its share of the clustered pixels.

use serde::{Deserialize, Serialize};

use crate::buffer::PixelBuffer;
use crate::cluster::{best_of, KmeansParams};
use crate::color::{quantize_channel, ColorEntry};
use crate::error::ExtractionError;

/// Tuning for [`DominantColorExtractor`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorOptions {
    /// Longest side allowed before downscaling (0 disables downscaling).
    pub max_size: u32,
    pub n_init: usize,
    pub max_iter: usize,
    pub converge: f32,
    pub seed: u64,
}

impl Default for ExtractorOptions {
    fn default() -> Self {
        let params = KmeansParams::default();
        Self {
            max_size: 500,
            n_init: params.n_init,
            max_iter: params.max_iter,
            converge: params.converge,
            seed: params.seed,
        }
    }
}

impl ExtractorOptions {
    pub fn kmeans_params(&self) -> KmeansParams {
        KmeansParams {
            n_init: self.n_init,
            max_iter: self.max_iter,
            converge: self.converge,
            seed: self.seed,
        }
    }
}

/// Derives the `k` dominant colors of a [`PixelBuffer`].
#[derive(Debug, Clone, Default)]
pub struct DominantColorExtractor {
    options: ExtractorOptions,
}

impl DominantColorExtractor {
    pub fn new(options: ExtractorOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ExtractorOptions {
        &self.options
    }

    /// Extract up to `k` colors, sorted by percentage descending.
    ///
    /// Returns an empty sequence when extraction is impossible (fewer pixels
    /// than `k`, invalid `k`); callers must treat empty as failure. Use
    /// [`try_extract`](Self::try_extract) to learn why.
    pub fn extract(&self, buffer: &PixelBuffer, k: usize) -> Vec<ColorEntry> {
        self.try_extract(buffer, k).unwrap_or_default()
    }

    /// Extract up to `k` colors, reporting why extraction failed.
    ///
    /// Empty clusters are dropped, so fewer than `k` entries come back when
    /// the image has fewer than `k` distinct colors. Ties in percentage keep
    /// cluster index order.
    pub fn try_extract(
        &self,
        buffer: &PixelBuffer,
        k: usize,
    ) -> Result<Vec<ColorEntry>, ExtractionError> {
        if k == 0 || k > u8::MAX as usize {
            return Err(ExtractionError::InvalidClusterCount { k });
        }
        // Cheap check on the raw buffer before paying for the resize
        if buffer.pixel_count() < k {
            return Err(ExtractionError::InsufficientPixels {
                pixels: buffer.pixel_count(),
                k,
            });
        }

        let points = buffer.color_points(self.options.max_size);
        if points.len() < k {
            return Err(ExtractionError::InsufficientPixels {
                pixels: points.len(),
                k,
            });
        }

        let clustering = best_of(&points, k, &self.options.kmeans_params())
            .ok_or(ExtractionError::InsufficientPixels {
                pixels: points.len(),
                k,
            })?;

        let total = clustering.labels.len();
        if total == 0 {
            return Err(ExtractionError::EmptyClustering);
        }

        let mut colors: Vec<ColorEntry> = clustering
            .centroids
            .iter()
            .zip(clustering.counts())
            .filter(|(_, count)| *count > 0)
            .map(|(centroid, count)| {
                let rgb = (
                    quantize_channel(centroid[0]),
                    quantize_channel(centroid[1]),
                    quantize_channel(centroid[2]),
                );
                ColorEntry::new(rgb, count as f64 / total as f64)
            })
            .collect();

        // Stable sort keeps cluster index order for equal percentages
        colors.sort_by(|a, b| b.percentage.total_cmp(&a.percentage));
        Ok(colors)
    }
}
