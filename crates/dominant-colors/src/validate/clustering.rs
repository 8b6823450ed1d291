use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use super::result::ValidationResult;
use crate::buffer::PixelBuffer;
use crate::cluster::{best_of, silhouette_score, KmeansParams};
use crate::color::ColorEntry;
use crate::extract::ExtractorOptions;

pub const METRIC_SILHOUETTE: &str = "silhouette_score";
pub const METRIC_SAMPLE_SIZE: &str = "sample_size";
pub const METRIC_COLOR_VARIATION: &str = "color_variation";
pub const METRIC_PERCENTAGE_SUM: &str = "percentage_sum";

/// Tuning for [`ClusteringValidator`].
///
/// The re-clustering constants are deliberately separate from the
/// extractor's: the validator is an independent sanity check.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorOptions {
    /// Longest side allowed before downscaling (0 disables downscaling).
    ///
    /// Must match [`ExtractorOptions::max_size`](crate::ExtractorOptions) so
    /// the precondition checks the same pixels extraction clustered; use
    /// [`ValidatorOptions::for_extractor`]. Not read from configuration.
    #[serde(skip)]
    pub max_size: u32,
    /// Upper bound on pixels drawn for the silhouette computation.
    pub sample_size: usize,
    pub n_init: usize,
    pub max_iter: usize,
    pub converge: f32,
    pub seed: u64,
    /// Silhouette below this raises a warning.
    pub silhouette_threshold: f64,
    /// Mean per-channel standard deviation of the palette above this raises
    /// a warning.
    pub variation_threshold: f64,
    /// Allowed deviation of the percentage sum from 1.0.
    pub sum_tolerance: f64,
}

impl Default for ValidatorOptions {
    fn default() -> Self {
        Self {
            max_size: 500,
            sample_size: 500,
            n_init: 3,
            max_iter: 20,
            converge: 1e-4,
            seed: 42,
            silhouette_threshold: 0.5,
            variation_threshold: 15.0,
            sum_tolerance: 0.01,
        }
    }
}

impl ValidatorOptions {
    /// These options with the downscale taken from `extractor`.
    pub fn for_extractor(self, extractor: &ExtractorOptions) -> Self {
        Self {
            max_size: extractor.max_size,
            ..self
        }
    }

    pub fn kmeans_params(&self) -> KmeansParams {
        KmeansParams {
            n_init: self.n_init,
            max_iter: self.max_iter,
            converge: self.converge,
            seed: self.seed,
        }
    }
}

/// Quantitative sanity check of an extracted palette.
///
/// Re-samples the buffer, re-clusters the sample, scores cluster separation
/// and checks the palette for spread and percentage conservation. Numbers may
/// differ from the extractor's own run; only the thresholds matter.
#[derive(Debug, Clone, Default)]
pub struct ClusteringValidator {
    options: ValidatorOptions,
}

impl ClusteringValidator {
    pub fn new(options: ValidatorOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ValidatorOptions {
        &self.options
    }

    pub fn validate(
        &self,
        buffer: &PixelBuffer,
        colors: &[ColorEntry],
        k: usize,
    ) -> ValidationResult {
        let mut metrics = BTreeMap::new();
        let mut warnings = Vec::new();

        if k == 0 || k > u8::MAX as usize {
            return ValidationResult::failed(
                format!("invalid cluster count {k}"),
                metrics,
                warnings,
            );
        }

        let points = buffer.color_points(self.options.max_size);
        if points.len() < k {
            return ValidationResult::failed(
                format!(
                    "insufficient pixels for validation: {} sampled, {} clusters required",
                    points.len(),
                    k
                ),
                metrics,
                warnings,
            );
        }
        if colors.is_empty() {
            return ValidationResult::failed("no colors to validate", metrics, warnings);
        }

        // Cluster separation on an independent random sample
        let sample_len = self.options.sample_size.max(k).min(points.len());
        let mut rng = StdRng::seed_from_u64(self.options.seed);
        let sample: Vec<[f32; 3]> = rand::seq::index::sample(&mut rng, points.len(), sample_len)
            .into_iter()
            .map(|i| points[i])
            .collect();

        let Some(clustering) = best_of(&sample, k, &self.options.kmeans_params()) else {
            return ValidationResult::failed("re-clustering of sample failed", metrics, warnings);
        };
        let silhouette = silhouette_score(&sample, &clustering.labels);
        metrics.insert(METRIC_SILHOUETTE.to_string(), silhouette);
        metrics.insert(METRIC_SAMPLE_SIZE.to_string(), sample_len as f64);
        if silhouette < self.options.silhouette_threshold {
            warnings.push(format!("Low silhouette score ({silhouette:.2})"));
        }

        let variation = color_variation(colors);
        metrics.insert(METRIC_COLOR_VARIATION.to_string(), variation);
        if variation > self.options.variation_threshold {
            warnings.push(format!("High color variation ({variation:.2})"));
        }

        let percentage_sum: f64 = colors.iter().map(|c| c.percentage).sum();
        metrics.insert(METRIC_PERCENTAGE_SUM.to_string(), percentage_sum);
        if (percentage_sum - 1.0).abs() > self.options.sum_tolerance {
            warnings.push(format!("Percentage sum incorrect ({percentage_sum:.2})"));
        }

        if let Some((name, _)) = metrics.iter().find(|(_, v)| !v.is_finite()) {
            let error = format!("metric {name} is not finite");
            return ValidationResult::failed(error, metrics, warnings);
        }

        ValidationResult::completed(metrics, warnings)
    }
}

/// Mean over R, G, B of the population standard deviation of the palette's
/// centroid channels.
fn color_variation(colors: &[ColorEntry]) -> f64 {
    let n = colors.len() as f64;
    let channel_std = |channel: usize| {
        let values: Vec<f64> = colors.iter().map(|c| c.channels()[channel] as f64).collect();
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        variance.sqrt()
    };
    (channel_std(0) + channel_std(1) + channel_std(2)) / 3.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::ValidationStatus;

    fn block_image(blocks: &[([u8; 3], usize)], width: u32) -> PixelBuffer {
        let pixels: Vec<[u8; 3]> = blocks
            .iter()
            .flat_map(|(c, n)| std::iter::repeat(*c).take(*n))
            .collect();
        let height = pixels.len() as u32 / width;
        PixelBuffer::from_pixels(width, height, &pixels).unwrap()
    }

    #[test]
    fn test_color_variation_of_identical_colors_is_zero() {
        let colors = vec![
            ColorEntry::new((10, 20, 30), 0.5),
            ColorEntry::new((10, 20, 30), 0.5),
        ];
        assert_eq!(color_variation(&colors), 0.0);
    }

    #[test]
    fn test_color_variation_population_std() {
        // each channel: values 0 and 20 -> std 10
        let colors = vec![
            ColorEntry::new((0, 0, 0), 0.5),
            ColorEntry::new((20, 20, 20), 0.5),
        ];
        assert!((color_variation(&colors) - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_fail_when_fewer_pixels_than_k() {
        let buffer = PixelBuffer::from_pixels(2, 2, &[[5, 5, 5]; 4]).unwrap();
        let colors = vec![ColorEntry::new((5, 5, 5), 1.0)];
        let result = ClusteringValidator::default().validate(&buffer, &colors, 5);

        assert_eq!(result.status, ValidationStatus::Fail);
        assert!(result.error.unwrap().contains("insufficient pixels"));
    }

    #[test]
    fn test_fail_on_empty_palette() {
        let buffer = block_image(&[([5, 5, 5], 25)], 5);
        let result = ClusteringValidator::default().validate(&buffer, &[], 2);
        assert_eq!(result.status, ValidationStatus::Fail);
    }

    #[test]
    fn test_pass_on_tight_blocks() {
        let buffer = block_image(&[([120, 60, 60], 15), ([130, 70, 70], 10)], 5);
        let colors = vec![
            ColorEntry::new((120, 60, 60), 0.6),
            ColorEntry::new((130, 70, 70), 0.4),
        ];
        let result = ClusteringValidator::default().validate(&buffer, &colors, 2);

        assert_eq!(result.status, ValidationStatus::Pass, "{:?}", result.warnings);
        assert!((result.metric(METRIC_SILHOUETTE).unwrap() - 1.0).abs() < 1e-9);
        assert!((result.metric(METRIC_PERCENTAGE_SUM).unwrap() - 1.0).abs() < 1e-12);
        assert!((result.metric(METRIC_COLOR_VARIATION).unwrap() - 5.0).abs() < 1e-12);
        assert_eq!(result.metric(METRIC_SAMPLE_SIZE), Some(25.0));
    }

    #[test]
    fn test_warning_on_spread_palette() {
        let buffer = block_image(&[([250, 0, 0], 15), ([0, 0, 250], 10)], 5);
        let colors = vec![
            ColorEntry::new((250, 0, 0), 0.6),
            ColorEntry::new((0, 0, 250), 0.4),
        ];
        let result = ClusteringValidator::default().validate(&buffer, &colors, 2);

        assert_eq!(result.status, ValidationStatus::Warning);
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].starts_with("High color variation"));
    }

    #[test]
    fn test_warning_on_percentage_leak() {
        let buffer = block_image(&[([120, 60, 60], 15), ([130, 70, 70], 10)], 5);
        let colors = vec![
            ColorEntry::new((120, 60, 60), 0.6),
            ColorEntry::new((130, 70, 70), 0.3),
        ];
        let result = ClusteringValidator::default().validate(&buffer, &colors, 2);

        assert_eq!(result.status, ValidationStatus::Warning);
        assert_eq!(result.warnings, vec!["Percentage sum incorrect (0.90)".to_string()]);
    }

    #[test]
    fn test_warning_on_low_silhouette() {
        // one color asked to split into two clusters: silhouette is 0
        let buffer = block_image(&[([100, 100, 100], 25)], 5);
        let colors = vec![ColorEntry::new((100, 100, 100), 1.0)];
        let result = ClusteringValidator::default().validate(&buffer, &colors, 2);

        assert_eq!(result.status, ValidationStatus::Warning);
        assert_eq!(result.metric(METRIC_SILHOUETTE), Some(0.0));
        assert!(result.warnings[0].starts_with("Low silhouette score"));
    }

    #[test]
    fn test_precondition_uses_extractor_downscale() {
        // 30x30 shrinks to 2x2 at max_size 2: too few pixels for k = 5
        let buffer = block_image(&[([50, 50, 50], 450), ([200, 200, 200], 450)], 30);
        let colors = vec![
            ColorEntry::new((50, 50, 50), 0.5),
            ColorEntry::new((200, 200, 200), 0.5),
        ];
        let extractor = ExtractorOptions {
            max_size: 2,
            ..ExtractorOptions::default()
        };
        let options = ValidatorOptions::default().for_extractor(&extractor);
        assert_eq!(options.max_size, 2);

        let result = ClusteringValidator::new(options).validate(&buffer, &colors, 5);
        assert_eq!(result.status, ValidationStatus::Fail);
        assert!(result.error.unwrap().contains("4 sampled"));
    }

    #[test]
    fn test_max_size_not_deserialized() {
        let options: ValidatorOptions =
            serde_json::from_str(r#"{"max_size": 7, "sample_size": 100}"#).unwrap();
        assert_eq!(options.max_size, ValidatorOptions::default().max_size);
        assert_eq!(options.sample_size, 100);
    }

    #[test]
    fn test_sample_is_bounded() {
        let pixels: Vec<[u8; 3]> = (0..40 * 40u32)
            .map(|i| if i % 2 == 0 { [200, 200, 200] } else { [195, 195, 195] })
            .collect();
        let buffer = PixelBuffer::from_pixels(40, 40, &pixels).unwrap();
        let colors = vec![
            ColorEntry::new((200, 200, 200), 0.5),
            ColorEntry::new((195, 195, 195), 0.5),
        ];
        let options = ValidatorOptions {
            sample_size: 100,
            ..ValidatorOptions::default()
        };
        let result = ClusteringValidator::new(options).validate(&buffer, &colors, 2);

        assert_eq!(result.metric(METRIC_SAMPLE_SIZE), Some(100.0));
    }
}
