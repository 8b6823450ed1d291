//! Error types for color extraction.

use std::fmt;

/// Error type for dominant color extraction.
///
/// Extraction is deterministic for a given buffer and configuration, so
/// none of these are worth retrying.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractionError {
    /// Requested cluster count is outside `1..=255`.
    InvalidClusterCount {
        /// Requested number of clusters
        k: usize,
    },
    /// Fewer (possibly downscaled) pixels than requested clusters.
    InsufficientPixels {
        /// Pixels available for clustering
        pixels: usize,
        /// Requested number of clusters
        k: usize,
    },
    /// Clustering finished without assigning any pixel.
    EmptyClustering,
}

impl fmt::Display for ExtractionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionError::InvalidClusterCount { k } => {
                write!(f, "invalid cluster count {} (expected 1..=255)", k)
            }
            ExtractionError::InsufficientPixels { pixels, k } => {
                write!(
                    f,
                    "insufficient pixels: {} available, {} clusters requested",
                    pixels, k
                )
            }
            ExtractionError::EmptyClustering => {
                write!(f, "clustering assigned no pixels")
            }
        }
    }
}

impl std::error::Error for ExtractionError {}
