use std::time::Duration;

use dominant_colors::ExtractionError;
use thiserror::Error;

/// Failure to obtain a usable pixel buffer for one image reference.
///
/// Everything except `UnsupportedReference`, `Exhausted` and a missing or
/// unreadable local file is treated as transient by the ingestor and retried.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Unsupported image reference: {0}")]
    UnsupportedReference(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Unexpected HTTP status: {0}")]
    Status(u16),

    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    #[error("Empty payload")]
    EmptyPayload,

    #[error("Image decode error: {0}")]
    Decode(String),

    #[error("Decoded image has no pixels")]
    EmptyImage,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image unavailable after {attempts} attempts: {last}")]
    Exhausted {
        attempts: u32,
        last: Box<IngestError>,
    },
}

impl IngestError {
    /// Whether another attempt could succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            IngestError::UnsupportedReference(_) | IngestError::Exhausted { .. } => false,
            IngestError::Io(e) => !matches!(
                e.kind(),
                std::io::ErrorKind::NotFound | std::io::ErrorKind::PermissionDenied
            ),
            _ => true,
        }
    }
}

#[derive(Debug, Error)]
pub enum PredictorError {
    #[error("Prediction failed: {0}")]
    Failed(String),

    #[error("Invalid prediction scores: {0}")]
    InvalidScores(String),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid timestamp '{0}'")]
    Timestamp(String),

    #[error("Database schema version {found} is newer than supported version {supported}")]
    Schema { found: i32, supported: i32 },

    #[error("Storage task failed: {0}")]
    Task(String),
}

/// Why a single image produced no report.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Image unavailable: {0}")]
    Ingest(#[from] IngestError),

    #[error("Color analysis failed: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("Predictor failed: {0}")]
    Predictor(#[from] PredictorError),

    #[error("Analysis task failed: {0}")]
    Task(String),
}
