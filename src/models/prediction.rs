use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::PredictorError;

/// One classifier verdict: the winning label, its confidence and the full
/// score distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub predicted: String,
    pub confidence: f64,
    pub all_options: BTreeMap<String, f64>,
}

impl PredictionResult {
    pub fn new(
        predicted: impl Into<String>,
        confidence: f64,
        all_options: BTreeMap<String, f64>,
    ) -> Self {
        Self {
            predicted: predicted.into(),
            confidence,
            all_options,
        }
    }

    /// Build a result from labelled scores; the highest score wins.
    ///
    /// Equal scores resolve to the label listed first.
    pub fn from_scores<I, S>(scores: I) -> Result<Self, PredictorError>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let mut all_options = BTreeMap::new();
        let mut best: Option<(String, f64)> = None;

        for (label, score) in scores {
            let label = label.into();
            if !score.is_finite() {
                return Err(PredictorError::InvalidScores(format!(
                    "score for '{label}' is not finite"
                )));
            }
            match &best {
                Some((_, best_score)) if score <= *best_score => {}
                _ => best = Some((label.clone(), score)),
            }
            all_options.insert(label, score);
        }

        let (predicted, confidence) =
            best.ok_or_else(|| PredictorError::InvalidScores("no labels".to_string()))?;
        Ok(Self {
            predicted,
            confidence,
            all_options,
        })
    }

    pub fn option(&self, label: &str) -> Option<f64> {
        self.all_options.get(label).copied()
    }
}
