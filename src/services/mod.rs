pub mod aggregator;
pub mod ingestor;
pub mod orchestrator;
pub mod prediction_validator;
pub mod predictor;
pub mod report_store;
pub mod sqlite_store;

pub use aggregator::ClusterAggregator;
pub use ingestor::{
    list_image_files, Backoff, FsTransport, HttpTransport, ImageIngestor, RetryPolicy,
    SourceTransport, Transport,
};
pub use orchestrator::AnalysisOrchestrator;
pub use prediction_validator::PredictionValidator;
pub use predictor::{Predictor, StaticPredictor};
pub use report_store::{InMemoryReportStore, ReportStore};
pub use sqlite_store::SqliteReportStore;
