use std::sync::Arc;

use chrono::Utc;
use dominant_colors::{
    ClusteringValidator, ColorEntry, DominantColorExtractor, ExtractionError, PixelBuffer,
    ValidationResult,
};
use tracing::Instrument;

use super::{ImageIngestor, PredictionValidator, Predictor, ReportStore};
use crate::error::AnalysisError;
use crate::models::{AnalysisReport, AppConfig, PredictionResult};

/// Runs ingest → extract → validate → predict for one image and persists the
/// resulting report
pub struct AnalysisOrchestrator {
    ingestor: ImageIngestor,
    extractor: DominantColorExtractor,
    color_validator: ClusteringValidator,
    prediction_validator: PredictionValidator,
    store: Arc<dyn ReportStore>,
    palette_size: usize,
}

/// CPU-bound part of one analysis
struct ImageAnalysis {
    colors: Vec<ColorEntry>,
    color_validation: ValidationResult,
    pattern: PredictionResult,
    style: PredictionResult,
    prediction_validation: ValidationResult,
}

impl AnalysisOrchestrator {
    pub fn new(config: &AppConfig, ingestor: ImageIngestor, store: Arc<dyn ReportStore>) -> Self {
        Self {
            ingestor,
            extractor: DominantColorExtractor::new(config.extraction),
            color_validator: ClusteringValidator::new(config.validator_options()),
            prediction_validator: PredictionValidator::new(
                config.prediction.confidence_threshold,
            ),
            store,
            palette_size: config.palette_size,
        }
    }

    pub fn palette_size(&self) -> usize {
        self.palette_size
    }

    pub fn store(&self) -> &Arc<dyn ReportStore> {
        &self.store
    }

    /// Analyze one image; `None` means the image was skipped.
    ///
    /// Never fails: every error is logged and turned into `None`. A
    /// persistence failure is logged and the report is still returned.
    pub async fn analyze(
        &self,
        image_ref: &str,
        predictor: Arc<dyn Predictor>,
    ) -> Option<AnalysisReport> {
        match self.try_analyze(image_ref, predictor).await {
            Ok(report) => Some(report),
            Err(e) => {
                tracing::warn!(image_ref, error = %e, "Skipping image");
                None
            }
        }
    }

    /// Analyze one image, reporting why it produced no report.
    pub async fn try_analyze(
        &self,
        image_ref: &str,
        predictor: Arc<dyn Predictor>,
    ) -> Result<AnalysisReport, AnalysisError> {
        let span = tracing::info_span!("analyze", image_ref = %image_ref);
        async {
            let buffer = self.ingestor.fetch(image_ref).await?;
            let analysis = self.run_blocking(buffer, predictor).await?;

            for warning in analysis
                .color_validation
                .warnings
                .iter()
                .chain(&analysis.prediction_validation.warnings)
            {
                tracing::info!(%warning, "Validation warning");
            }

            let report = AnalysisReport {
                image_ref: image_ref.to_string(),
                timestamp: Utc::now(),
                colors: analysis.colors,
                pattern: analysis.pattern,
                style: analysis.style,
                color_validation: analysis.color_validation,
                prediction_validation: analysis.prediction_validation,
            };
            tracing::info!(
                colors = report.colors.len(),
                color_status = %report.color_validation.status,
                prediction_status = %report.prediction_validation.status,
                "Image analyzed"
            );

            if let Err(e) = self.store.store_analysis_report(&report).await {
                tracing::warn!(error = %e, "Failed to persist analysis report");
            }
            Ok(report)
        }
        .instrument(span)
        .await
    }

    /// Extraction, validation and prediction on the blocking pool
    async fn run_blocking(
        &self,
        buffer: PixelBuffer,
        predictor: Arc<dyn Predictor>,
    ) -> Result<ImageAnalysis, AnalysisError> {
        let extractor = self.extractor.clone();
        let color_validator = self.color_validator.clone();
        let prediction_validator = self.prediction_validator;
        let k = self.palette_size;
        let span = tracing::Span::current();

        tokio::task::spawn_blocking(move || -> Result<ImageAnalysis, AnalysisError> {
            let _entered = span.enter();

            let colors = extractor.try_extract(&buffer, k)?;
            if colors.is_empty() {
                return Err(ExtractionError::EmptyClustering.into());
            }
            let color_validation = color_validator.validate(&buffer, &colors, k);

            let (pattern, style) = predictor.predict(&buffer)?;
            let prediction_validation = prediction_validator.validate(&pattern, &style);

            Ok(ImageAnalysis {
                colors,
                color_validation,
                pattern,
                style,
                prediction_validation,
            })
        })
        .await
        .map_err(|e| AnalysisError::Task(e.to_string()))?
    }
}
