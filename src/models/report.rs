use chrono::{DateTime, Utc};
use dominant_colors::{ColorEntry, ValidationResult};
use serde::{Deserialize, Serialize};

use super::PredictionResult;

/// Everything learned about one image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub image_ref: String,
    pub timestamp: DateTime<Utc>,
    /// Dominant colors, most dominant first
    pub colors: Vec<ColorEntry>,
    pub pattern: PredictionResult,
    pub style: PredictionResult,
    pub color_validation: ValidationResult,
    pub prediction_validation: ValidationResult,
}

/// A color family ranked by its accumulated share across a cluster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopularColor {
    pub name: String,
    pub hex: String,
    pub total_percentage: f64,
    pub avg_percentage: f64,
    pub count: usize,
}

/// A pattern or style label ranked by how many images carried it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopularLabel {
    pub label: String,
    pub count: usize,
    /// `count` over the number of successfully analyzed images
    pub frequency: f64,
}

/// Aggregate view over a named collection of images.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterReport {
    pub cluster_name: String,
    pub timestamp: DateTime<Utc>,
    /// Every reference that was attempted, in input order
    pub image_refs: Vec<String>,
    /// Reports of the images that succeeded, in input order
    pub individual_reports: Vec<AnalysisReport>,
    pub popular_colors: Vec<PopularColor>,
    pub popular_patterns: Vec<PopularLabel>,
    pub popular_styles: Vec<PopularLabel>,
}

impl ClusterReport {
    /// An empty report for `cluster_name`, stamped now.
    pub fn new(cluster_name: impl Into<String>, image_refs: Vec<String>) -> Self {
        Self {
            cluster_name: cluster_name.into(),
            timestamp: Utc::now(),
            image_refs,
            individual_reports: Vec::new(),
            popular_colors: Vec::new(),
            popular_patterns: Vec::new(),
            popular_styles: Vec::new(),
        }
    }

    /// Number of images that produced a report.
    pub fn success_count(&self) -> usize {
        self.individual_reports.len()
    }
}
