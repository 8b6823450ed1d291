use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Verdict of a validation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ValidationStatus {
    /// All metrics within thresholds.
    Pass,
    /// Computation completed but at least one metric crossed a soft threshold.
    Warning,
    /// Precondition violated or computation failed.
    Fail,
}

impl ValidationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationStatus::Pass => "PASS",
            ValidationStatus::Warning => "WARNING",
            ValidationStatus::Fail => "FAIL",
        }
    }
}

impl fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one validation call: status, named metrics, ordered warnings
/// and an optional error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub status: ValidationStatus,
    pub metrics: BTreeMap<String, f64>,
    pub warnings: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ValidationResult {
    /// A failed validation carrying `error` and whatever metrics and
    /// warnings were gathered before the failure.
    pub fn failed(
        error: impl Into<String>,
        metrics: BTreeMap<String, f64>,
        warnings: Vec<String>,
    ) -> Self {
        Self {
            status: ValidationStatus::Fail,
            metrics,
            warnings,
            error: Some(error.into()),
        }
    }

    /// A completed validation: WARNING if any warning was raised, else PASS.
    pub fn completed(metrics: BTreeMap<String, f64>, warnings: Vec<String>) -> Self {
        let status = if warnings.is_empty() {
            ValidationStatus::Pass
        } else {
            ValidationStatus::Warning
        };
        Self {
            status,
            metrics,
            warnings,
            error: None,
        }
    }

    pub fn metric(&self, name: &str) -> Option<f64> {
        self.metrics.get(name).copied()
    }

    pub fn is_pass(&self) -> bool {
        self.status == ValidationStatus::Pass
    }
}
