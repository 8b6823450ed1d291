//! dominant-colors: Dominant color extraction and clustering validation
//!
//! This library reduces a raster image to its `k` most representative colors
//! with k-means, scores the quality of that clustering, and maps colors to
//! human-readable names.
//!
//! # Quick Start
//!
//! ```
//! use dominant_colors::{DominantColorExtractor, PixelBuffer};
//!
//! let mut pixels = vec![[200, 30, 30]; 6];
//! pixels.extend(vec![[20, 20, 220]; 3]);
//! let buffer = PixelBuffer::from_pixels(3, 3, &pixels).unwrap();
//!
//! let colors = DominantColorExtractor::default().extract(&buffer, 2);
//! assert_eq!(colors.len(), 2);
//! assert_eq!(colors[0].hex, "#c81e1e");
//! ```
//!
//! # Validation
//!
//! [`ClusteringValidator`] re-clusters an independent pixel sample and reports
//! a [`ValidationResult`] with three metrics:
//!
//! - `silhouette_score`: separation of the re-clustered sample
//! - `color_variation`: mean per-channel standard deviation of the palette
//! - `percentage_sum`: how close the palette shares add up to 1.0
//!
//! ```
//! use dominant_colors::{ClusteringValidator, DominantColorExtractor, PixelBuffer};
//!
//! let mut pixels = vec![[120, 60, 60]; 15];
//! pixels.extend(vec![[130, 70, 70]; 10]);
//! let buffer = PixelBuffer::from_pixels(5, 5, &pixels).unwrap();
//!
//! let colors = DominantColorExtractor::default().extract(&buffer, 2);
//! let result = ClusteringValidator::default().validate(&buffer, &colors, 2);
//! assert!(result.is_pass());
//! ```
//!
//! # Naming
//!
//! [`ColorNameTable::css3`] maps any RGB triple to its nearest CSS3 color
//! name. A [`FamilyNormalizer`] merges shade variants ("darkred", "red") into
//! one family for aggregation.
//!
//! # Determinism
//!
//! Every random choice (k-means initialisation, validation sampling) is driven
//! by an explicit seed, so the same buffer and options give the same output.

pub mod buffer;
pub mod cluster;
pub mod color;
pub mod error;
pub mod extract;
pub mod validate;


pub use buffer::PixelBuffer;
pub use cluster::{silhouette_score, Clustering, KmeansParams};
pub use color::{
    to_hex, ColorEntry, ColorNameTable, ExactName, FamilyNormalizer, NamedColor,
    ShadeModifierStripper,
};
pub use error::ExtractionError;
pub use extract::{DominantColorExtractor, ExtractorOptions};
pub use validate::{ClusteringValidator, ValidationResult, ValidationStatus, ValidatorOptions};
