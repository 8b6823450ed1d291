use dominant_colors::PixelBuffer;

use crate::error::PredictorError;
use crate::models::PredictionResult;

/// Pattern and style classifier.
///
/// Implementations are synchronous and must not mutate shared state; the
/// orchestrator calls them from a blocking worker thread.
pub trait Predictor: Send + Sync {
    /// Returns `(pattern, style)` for the image
    fn predict(
        &self,
        buffer: &PixelBuffer,
    ) -> Result<(PredictionResult, PredictionResult), PredictorError>;
}

impl<F> Predictor for F
where
    F: Fn(&PixelBuffer) -> Result<(PredictionResult, PredictionResult), PredictorError>
        + Send
        + Sync,
{
    fn predict(
        &self,
        buffer: &PixelBuffer,
    ) -> Result<(PredictionResult, PredictionResult), PredictorError> {
        self(buffer)
    }
}

/// Stand-in classifier returning the same scores for every image
#[derive(Debug, Clone)]
pub struct StaticPredictor {
    pattern_scores: Vec<(String, f64)>,
    style_scores: Vec<(String, f64)>,
}

impl StaticPredictor {
    pub fn new(pattern_scores: Vec<(String, f64)>, style_scores: Vec<(String, f64)>) -> Self {
        Self {
            pattern_scores,
            style_scores,
        }
    }
}

impl Default for StaticPredictor {
    fn default() -> Self {
        let owned = |scores: &[(&str, f64)]| {
            scores
                .iter()
                .map(|(label, score)| (label.to_string(), *score))
                .collect()
        };
        Self::new(
            owned(&[
                ("floral", 0.82),
                ("striped", 0.10),
                ("geometric", 0.05),
                ("plain", 0.03),
            ]),
            owned(&[
                ("casual", 0.75),
                ("formal", 0.15),
                ("bohemian", 0.07),
                ("sporty", 0.03),
            ]),
        )
    }
}

impl Predictor for StaticPredictor {
    fn predict(
        &self,
        _buffer: &PixelBuffer,
    ) -> Result<(PredictionResult, PredictionResult), PredictorError> {
        let pattern = PredictionResult::from_scores(self.pattern_scores.iter().cloned())?;
        let style = PredictionResult::from_scores(self.style_scores.iter().cloned())?;
        Ok((pattern, style))
    }
}
