use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::models::{AnalysisReport, ClusterReport};

/// Persistence for analysis and cluster reports
#[async_trait]
pub trait ReportStore: Send + Sync {
    /// Persist one per-image report
    async fn store_analysis_report(&self, report: &AnalysisReport) -> Result<(), StoreError>;

    /// Persist one cluster report
    async fn store_cluster_report(&self, report: &ClusterReport) -> Result<(), StoreError>;

    /// Stored per-image reports in insertion order, optionally only those
    /// for `image_ref`
    async fn query_reports(&self, image_ref: Option<&str>)
        -> Result<Vec<AnalysisReport>, StoreError>;
}

/// In-memory report storage
#[derive(Default)]
pub struct InMemoryReportStore {
    analyses: Arc<RwLock<Vec<AnalysisReport>>>,
    clusters: Arc<RwLock<Vec<ClusterReport>>>,
}

impl InMemoryReportStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored cluster reports in insertion order
    pub async fn cluster_reports(&self) -> Vec<ClusterReport> {
        self.clusters.read().await.clone()
    }
}

#[async_trait]
impl ReportStore for InMemoryReportStore {
    async fn store_analysis_report(&self, report: &AnalysisReport) -> Result<(), StoreError> {
        self.analyses.write().await.push(report.clone());
        Ok(())
    }

    async fn store_cluster_report(&self, report: &ClusterReport) -> Result<(), StoreError> {
        self.clusters.write().await.push(report.clone());
        Ok(())
    }

    async fn query_reports(
        &self,
        image_ref: Option<&str>,
    ) -> Result<Vec<AnalysisReport>, StoreError> {
        let analyses = self.analyses.read().await;
        Ok(analyses
            .iter()
            .filter(|r| image_ref.map_or(true, |wanted| r.image_ref == wanted))
            .cloned()
            .collect())
    }
}
