//! Custom assertions for analysis reports.

use dominant_colors::{ColorEntry, ValidationStatus};
use fabric_lens::models::{AnalysisReport, PopularLabel};

/// Percentages sum to 1 and are sorted descending
pub fn assert_valid_palette(colors: &[ColorEntry]) {
    assert!(!colors.is_empty(), "Palette should not be empty");
    let sum: f64 = colors.iter().map(|c| c.percentage).sum();
    assert!((sum - 1.0).abs() <= 0.01, "Percentages sum to {sum}");
    assert!(
        colors.windows(2).all(|w| w[0].percentage >= w[1].percentage),
        "Palette not sorted: {colors:?}"
    );
    for color in colors {
        assert_eq!(color.hex.len(), 7, "Bad hex {}", color.hex);
        assert!(color.hex.starts_with('#'));
    }
}

/// Both validations passed
pub fn assert_report_passes(report: &AnalysisReport) {
    assert_valid_palette(&report.colors);
    assert_eq!(
        report.color_validation.status,
        ValidationStatus::Pass,
        "color warnings: {:?}",
        report.color_validation.warnings
    );
    assert_eq!(
        report.prediction_validation.status,
        ValidationStatus::Pass,
        "prediction warnings: {:?}",
        report.prediction_validation.warnings
    );
}

/// Frequencies of all observed labels add up to one
pub fn assert_frequencies_sum_to_one(labels: &[PopularLabel]) {
    let sum: f64 = labels.iter().map(|l| l.frequency).sum();
    assert!((sum - 1.0).abs() < 1e-9, "Frequencies sum to {sum}");
}
