//! Pipeline factory for integration tests.

use std::sync::Arc;
use std::time::Duration;

use dominant_colors::{ColorNameTable, ShadeModifierStripper};
use fabric_lens::models::AppConfig;
use fabric_lens::services::{
    AnalysisOrchestrator, ClusterAggregator, ImageIngestor, InMemoryReportStore, ReportStore,
    RetryPolicy, SourceTransport,
};

/// Orchestrator over HTTP and the filesystem with fast retries and an
/// in-memory store
pub struct TestPipeline {
    pub orchestrator: Arc<AnalysisOrchestrator>,
    pub store: Arc<InMemoryReportStore>,
}

impl TestPipeline {
    /// Pipeline extracting `palette_size` colors per image
    pub fn new(palette_size: usize) -> Self {
        let store = Arc::new(InMemoryReportStore::new());
        Self::with_store(palette_size, store.clone(), store)
    }

    pub fn with_store(
        palette_size: usize,
        store: Arc<dyn ReportStore>,
        memory: Arc<InMemoryReportStore>,
    ) -> Self {
        let config = AppConfig {
            palette_size,
            ..AppConfig::default()
        };
        let ingestor = ImageIngestor::new(
            Arc::new(SourceTransport::default()),
            fast_retries(),
            Duration::from_secs(5),
        );
        Self {
            orchestrator: Arc::new(AnalysisOrchestrator::new(&config, ingestor, store)),
            store: memory,
        }
    }

    /// Aggregator grouping color shades into families
    pub fn aggregator(&self, workers: usize) -> ClusterAggregator {
        ClusterAggregator::new(
            self.orchestrator.clone(),
            Arc::new(ColorNameTable::css3()),
            Arc::new(ShadeModifierStripper::default()),
        )
        .with_workers(workers)
    }
}

/// Three attempts, 10ms apart
pub fn fast_retries() -> RetryPolicy {
    RetryPolicy::fixed(3, Duration::from_millis(10))
}
