//! Plain-text report rendering.

use std::fmt;

use dominant_colors::ValidationResult;

use crate::models::{AnalysisReport, ClusterReport, PopularLabel, PredictionResult};

/// Human-readable summary of one image analysis
pub fn render_analysis_report(report: &AnalysisReport) -> String {
    AnalysisText(report).to_string()
}

/// Human-readable summary of a cluster analysis
pub fn render_cluster_report(report: &ClusterReport) -> String {
    ClusterText(report).to_string()
}

struct AnalysisText<'a>(&'a AnalysisReport);

impl fmt::Display for AnalysisText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;
        writeln!(f, "=== FASHION IMAGE ANALYSIS REPORT ===")?;
        writeln!(f)?;
        writeln!(f, "Image: {}", report.image_ref)?;
        writeln!(f, "Analysis Date: {}", report.timestamp.to_rfc3339())?;
        writeln!(f)?;

        writeln!(f, "=== COLOR ANALYSIS ===")?;
        writeln!(f, "Dominant Colors:")?;
        for (idx, color) in report.colors.iter().enumerate() {
            writeln!(f, "{}. {}: {}", idx + 1, color.hex, percent(color.percentage))?;
        }
        writeln!(f)?;
        write_validation(f, &report.color_validation)?;

        writeln!(f)?;
        writeln!(f, "=== PATTERN ANALYSIS ===")?;
        write_prediction(f, &report.pattern)?;

        writeln!(f)?;
        writeln!(f, "=== STYLE ANALYSIS ===")?;
        write_prediction(f, &report.style)?;
        writeln!(f)?;
        write_validation(f, &report.prediction_validation)?;

        writeln!(f)?;
        writeln!(f, "=== VALIDATION SUMMARY ===")?;
        writeln!(f, "- Color Analysis: {}", report.color_validation.status)?;
        writeln!(
            f,
            "- Pattern/Style Analysis: {}",
            report.prediction_validation.status
        )
    }
}

struct ClusterText<'a>(&'a ClusterReport);

impl fmt::Display for ClusterText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;
        writeln!(f, "=== CLUSTER ANALYSIS REPORT: {} ===", report.cluster_name)?;
        writeln!(f)?;
        writeln!(f, "Analysis Date: {}", report.timestamp.to_rfc3339())?;
        writeln!(
            f,
            "Images analyzed: {} of {}",
            report.individual_reports.len(),
            report.image_refs.len()
        )?;
        writeln!(f)?;

        writeln!(f, "=== POPULAR COLORS ===")?;
        if report.popular_colors.is_empty() {
            writeln!(f, "(none)")?;
        }
        for (idx, color) in report.popular_colors.iter().enumerate() {
            writeln!(
                f,
                "{}. {} ({}): total {}, average {}, seen {} times",
                idx + 1,
                color.name,
                color.hex,
                percent(color.total_percentage),
                percent(color.avg_percentage),
                color.count
            )?;
        }

        writeln!(f)?;
        writeln!(f, "=== POPULAR PATTERNS ===")?;
        write_labels(f, &report.popular_patterns)?;

        writeln!(f)?;
        writeln!(f, "=== POPULAR STYLES ===")?;
        write_labels(f, &report.popular_styles)?;

        if !report.individual_reports.is_empty() {
            writeln!(f)?;
            writeln!(f, "=== IMAGES ===")?;
        }
        for image in &report.individual_reports {
            writeln!(
                f,
                "- {}: {} / {}, colors {}, predictions {}",
                image.image_ref,
                image.pattern.predicted,
                image.style.predicted,
                image.color_validation.status,
                image.prediction_validation.status
            )?;
        }
        Ok(())
    }
}

fn percent(fraction: f64) -> String {
    format!("{:.1}%", fraction * 100.0)
}

fn write_prediction(f: &mut fmt::Formatter<'_>, prediction: &PredictionResult) -> fmt::Result {
    writeln!(f, "Predicted: {}", prediction.predicted)?;
    writeln!(f, "Confidence: {:.2}", prediction.confidence)?;
    writeln!(f, "All options:")?;
    for (label, score) in &prediction.all_options {
        writeln!(f, "- {label}: {score:.2}")?;
    }
    Ok(())
}

fn write_validation(f: &mut fmt::Formatter<'_>, validation: &ValidationResult) -> fmt::Result {
    writeln!(f, "Validation Status: {}", validation.status)?;
    if let Some(error) = &validation.error {
        writeln!(f, "Error: {error}")?;
    }
    if !validation.warnings.is_empty() {
        writeln!(f, "Warnings:")?;
        for warning in &validation.warnings {
            writeln!(f, "- {warning}")?;
        }
    }
    Ok(())
}

fn write_labels(f: &mut fmt::Formatter<'_>, labels: &[PopularLabel]) -> fmt::Result {
    if labels.is_empty() {
        return writeln!(f, "(none)");
    }
    for (idx, label) in labels.iter().enumerate() {
        writeln!(
            f,
            "{}. {}: {} images ({})",
            idx + 1,
            label.label,
            label.count,
            percent(label.frequency)
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PopularColor;
    use chrono::Utc;
    use dominant_colors::ColorEntry;
    use std::collections::BTreeMap;

    fn report() -> AnalysisReport {
        AnalysisReport {
            image_ref: "https://example.com/dress.png".to_string(),
            timestamp: Utc::now(),
            colors: vec![
                ColorEntry::new((180, 40, 40), 0.6),
                ColorEntry::new((30, 60, 200), 0.4),
            ],
            pattern: PredictionResult::from_scores([("floral", 0.82), ("plain", 0.18)]).unwrap(),
            style: PredictionResult::from_scores([("casual", 0.55), ("formal", 0.45)]).unwrap(),
            color_validation: ValidationResult::completed(BTreeMap::new(), Vec::new()),
            prediction_validation: ValidationResult::completed(
                BTreeMap::new(),
                vec!["Low style confidence (0.55)".to_string()],
            ),
        }
    }

    #[test]
    fn test_analysis_report_text() {
        let text = render_analysis_report(&report());

        assert!(text.contains("Image: https://example.com/dress.png"));
        assert!(text.contains("1. #b42828: 60.0%"));
        assert!(text.contains("2. #1e3cc8: 40.0%"));
        assert!(text.contains("Predicted: floral\nConfidence: 0.82"));
        assert!(text.contains("- plain: 0.18"));
        assert!(text.contains("- Low style confidence (0.55)"));
        assert!(text.contains("- Color Analysis: PASS"));
        assert!(text.contains("- Pattern/Style Analysis: WARNING"));
    }

    #[test]
    fn test_cluster_report_text() {
        let mut cluster = ClusterReport::new("summer", vec!["a".into(), "b".into()]);
        cluster.individual_reports.push(report());
        cluster.popular_colors.push(PopularColor {
            name: "red".to_string(),
            hex: "#b42828".to_string(),
            total_percentage: 0.6,
            avg_percentage: 0.6,
            count: 1,
        });
        cluster.popular_patterns.push(PopularLabel {
            label: "floral".to_string(),
            count: 1,
            frequency: 1.0,
        });

        let text = render_cluster_report(&cluster);

        assert!(text.contains("CLUSTER ANALYSIS REPORT: summer"));
        assert!(text.contains("Images analyzed: 1 of 2"));
        assert!(text.contains("1. red (#b42828): total 60.0%, average 60.0%, seen 1 times"));
        assert!(text.contains("1. floral: 1 images (100.0%)"));
        assert!(text.contains("=== POPULAR STYLES ===\n(none)"));
    }

    #[test]
    fn test_empty_cluster_text() {
        let text = render_cluster_report(&ClusterReport::new("empty", Vec::new()));
        assert!(text.contains("Images analyzed: 0 of 0"));
        assert!(!text.contains("=== IMAGES ==="));
    }
}
