use std::collections::BTreeMap;

use dominant_colors::ValidationResult;

use crate::models::PredictionResult;

/// Confidence gate for pattern and style predictions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictionValidator {
    confidence_threshold: f64,
}

impl Default for PredictionValidator {
    fn default() -> Self {
        Self::new(0.6)
    }
}

impl PredictionValidator {
    pub fn new(confidence_threshold: f64) -> Self {
        Self {
            confidence_threshold,
        }
    }

    pub fn confidence_threshold(&self) -> f64 {
        self.confidence_threshold
    }

    /// WARNING when a confidence is strictly below the threshold, FAIL when a
    /// prediction is malformed, PASS otherwise.
    pub fn validate(
        &self,
        pattern: &PredictionResult,
        style: &PredictionResult,
    ) -> ValidationResult {
        let mut metrics = BTreeMap::new();
        let mut warnings = Vec::new();

        for (field, prediction) in [("pattern", pattern), ("style", style)] {
            if let Err(error) = check_well_formed(field, prediction) {
                return ValidationResult::failed(error, metrics, warnings);
            }
            metrics.insert(format!("{field}_confidence"), prediction.confidence);
            if prediction.confidence < self.confidence_threshold {
                warnings.push(format!(
                    "Low {field} confidence ({:.2})",
                    prediction.confidence
                ));
            }
        }

        ValidationResult::completed(metrics, warnings)
    }
}

fn check_well_formed(field: &str, prediction: &PredictionResult) -> Result<(), String> {
    if prediction.predicted.trim().is_empty() {
        return Err(format!("{field} prediction has no label"));
    }
    if !(0.0..=1.0).contains(&prediction.confidence) {
        return Err(format!(
            "{field} confidence {} is outside [0, 1]",
            prediction.confidence
        ));
    }
    Ok(())
}
