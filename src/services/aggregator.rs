//! Cluster-level analysis and popularity ranking.

use std::collections::HashMap;
use std::sync::Arc;

use dominant_colors::{ColorNameTable, FamilyNormalizer};
use futures_util::stream::{self, StreamExt};
use tracing::Instrument;

use super::{AnalysisOrchestrator, Predictor};
use crate::models::{AnalysisReport, ClusterReport, PopularColor, PopularLabel};

/// Color families kept in a cluster report
pub const TOP_COLORS: usize = 5;
/// Pattern and style labels kept in a cluster report
pub const TOP_LABELS: usize = 3;

/// Analyzes a named set of images and ranks their colors, patterns and styles
pub struct ClusterAggregator {
    orchestrator: Arc<AnalysisOrchestrator>,
    names: Arc<ColorNameTable>,
    normalizer: Arc<dyn FamilyNormalizer>,
    workers: usize,
}

impl ClusterAggregator {
    pub fn new(
        orchestrator: Arc<AnalysisOrchestrator>,
        names: Arc<ColorNameTable>,
        normalizer: Arc<dyn FamilyNormalizer>,
    ) -> Self {
        Self {
            orchestrator,
            names,
            normalizer,
            workers: 1,
        }
    }

    /// Analyze up to `workers` images at once (at least one)
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Attempt every reference and build the cluster report.
    ///
    /// Images that fail are skipped. Reports stay in input order whatever
    /// the worker count, so rankings are reproducible.
    pub async fn analyze_cluster(
        &self,
        image_refs: &[String],
        cluster_name: &str,
        predictor: Arc<dyn Predictor>,
    ) -> ClusterReport {
        let span = tracing::info_span!("cluster", cluster_name = %cluster_name);
        async {
            let mut report = ClusterReport::new(cluster_name, image_refs.to_vec());

            let results: Vec<Option<AnalysisReport>> = stream::iter(image_refs)
                .map(|image_ref| {
                    let predictor = Arc::clone(&predictor);
                    async move { self.orchestrator.analyze(image_ref, predictor).await }
                })
                .buffered(self.workers)
                .collect()
                .await;
            report.individual_reports = results.into_iter().flatten().collect();

            tracing::info!(
                attempted = image_refs.len(),
                succeeded = report.individual_reports.len(),
                "Cluster images analyzed"
            );

            let reports = &report.individual_reports;
            report.popular_colors =
                popular_colors(reports, &self.names, self.normalizer.as_ref(), TOP_COLORS);
            report.popular_patterns = popular_labels(
                reports.iter().map(|r| r.pattern.predicted.as_str()),
                reports.len(),
                TOP_LABELS,
            );
            report.popular_styles = popular_labels(
                reports.iter().map(|r| r.style.predicted.as_str()),
                reports.len(),
                TOP_LABELS,
            );

            if let Err(e) = self.orchestrator.store().store_cluster_report(&report).await {
                tracing::warn!(error = %e, "Failed to persist cluster report");
            }
            report
        }
        .instrument(span)
        .await
    }
}

struct FamilyTally {
    name: String,
    total: f64,
    count: usize,
    hex: String,
    largest: f64,
}

/// Rank color families by their summed percentage across `reports`.
///
/// Each family's hex is the hex of its single largest occurrence. Ties in
/// total keep first-seen order.
pub fn popular_colors(
    reports: &[AnalysisReport],
    names: &ColorNameTable,
    normalizer: &dyn FamilyNormalizer,
    limit: usize,
) -> Vec<PopularColor> {
    let mut tallies: Vec<FamilyTally> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for color in reports.iter().flat_map(|r| &r.colors) {
        let Some(family) = names.family(color.rgb, normalizer) else {
            continue;
        };
        match index.get(&family) {
            Some(&i) => {
                let tally = &mut tallies[i];
                tally.total += color.percentage;
                tally.count += 1;
                if color.percentage > tally.largest {
                    tally.largest = color.percentage;
                    tally.hex = color.hex.clone();
                }
            }
            None => {
                index.insert(family.clone(), tallies.len());
                tallies.push(FamilyTally {
                    name: family,
                    total: color.percentage,
                    count: 1,
                    hex: color.hex.clone(),
                    largest: color.percentage,
                });
            }
        }
    }

    tallies.sort_by(|a, b| b.total.total_cmp(&a.total));
    tallies
        .into_iter()
        .take(limit)
        .map(|t| PopularColor {
            avg_percentage: t.total / t.count as f64,
            name: t.name,
            hex: t.hex,
            total_percentage: t.total,
            count: t.count,
        })
        .collect()
}

/// Rank labels by occurrence; `frequency` is relative to `report_count`.
///
/// Ties keep first-seen order.
pub fn popular_labels<'a>(
    labels: impl IntoIterator<Item = &'a str>,
    report_count: usize,
    limit: usize,
) -> Vec<PopularLabel> {
    if report_count == 0 {
        return Vec::new();
    }

    let mut counts: Vec<(&str, usize)> = Vec::new();
    for label in labels {
        match counts.iter_mut().find(|(l, _)| *l == label) {
            Some((_, count)) => *count += 1,
            None => counts.push((label, 1)),
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
        .into_iter()
        .take(limit)
        .map(|(label, count)| PopularLabel {
            label: label.to_string(),
            count,
            frequency: count as f64 / report_count as f64,
        })
        .collect()
}
