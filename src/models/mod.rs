pub mod config;
pub mod prediction;
pub mod report;

pub use config::{AppConfig, ClusterConfig, IngestConfig, PredictionConfig};
pub use prediction::PredictionResult;
pub use report::{AnalysisReport, ClusterReport, PopularColor, PopularLabel};
