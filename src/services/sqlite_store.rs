//! SQLite-backed [`ReportStore`].
//!
//! Per-image reports go to `analysis_results`, one JSON column per section;
//! cluster reports go to `cluster_reports` as a single JSON document. The
//! schema version is tracked in `PRAGMA user_version`.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Transaction};

use super::ReportStore;
use crate::error::StoreError;
use crate::models::{AnalysisReport, ClusterReport};

const CURRENT_SCHEMA_VERSION: i32 = 1;

pub struct SqliteReportStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteReportStore {
    /// Open (or create) the database file and bring its schema up to date
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        Self::with_connection(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(mut conn: Connection) -> Result<Self, StoreError> {
        run_migrations(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run `task` against the connection on the blocking pool
    async fn execute<T, F>(&self, task: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> Result<T, StoreError> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut guard = conn
                .lock()
                .map_err(|_| StoreError::Task("database connection poisoned".to_string()))?;
            task(&mut *guard)
        })
        .await
        .map_err(|e| StoreError::Task(e.to_string()))?
    }

    /// Stored cluster reports in insertion order, optionally only `cluster_name`
    pub async fn cluster_reports(
        &self,
        cluster_name: Option<&str>,
    ) -> Result<Vec<ClusterReport>, StoreError> {
        let cluster_name = cluster_name.map(str::to_string);
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT report FROM cluster_reports
                 WHERE ?1 IS NULL OR cluster_name = ?1
                 ORDER BY id",
            )?;
            let documents = stmt
                .query_map(params![cluster_name], |row| row.get::<_, String>(0))?
                .collect::<Result<Vec<_>, _>>()?;

            documents
                .iter()
                .map(|doc| serde_json::from_str(doc).map_err(StoreError::from))
                .collect()
        })
        .await
    }
}

#[async_trait]
impl ReportStore for SqliteReportStore {
    async fn store_analysis_report(&self, report: &AnalysisReport) -> Result<(), StoreError> {
        let image_ref = report.image_ref.clone();
        let timestamp = report.timestamp.to_rfc3339();
        let colors = serde_json::to_string(&report.colors)?;
        let pattern = serde_json::to_string(&report.pattern)?;
        let style = serde_json::to_string(&report.style)?;
        let color_validation = serde_json::to_string(&report.color_validation)?;
        let prediction_validation = serde_json::to_string(&report.prediction_validation)?;

        self.execute(move |conn| {
            conn.execute(
                "INSERT INTO analysis_results
                 (image_ref, timestamp, colors, pattern, style,
                  color_validation, prediction_validation)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    image_ref,
                    timestamp,
                    colors,
                    pattern,
                    style,
                    color_validation,
                    prediction_validation
                ],
            )?;
            Ok(())
        })
        .await
    }

    async fn store_cluster_report(&self, report: &ClusterReport) -> Result<(), StoreError> {
        let cluster_name = report.cluster_name.clone();
        let timestamp = report.timestamp.to_rfc3339();
        let document = serde_json::to_string(report)?;

        self.execute(move |conn| {
            conn.execute(
                "INSERT INTO cluster_reports (cluster_name, timestamp, report)
                 VALUES (?1, ?2, ?3)",
                params![cluster_name, timestamp, document],
            )?;
            Ok(())
        })
        .await
    }

    async fn query_reports(
        &self,
        image_ref: Option<&str>,
    ) -> Result<Vec<AnalysisReport>, StoreError> {
        let image_ref = image_ref.map(str::to_string);
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT image_ref, timestamp, colors, pattern, style,
                        color_validation, prediction_validation
                 FROM analysis_results
                 WHERE ?1 IS NULL OR image_ref = ?1
                 ORDER BY id",
            )?;
            let rows = stmt
                .query_map(params![image_ref], |row| {
                    Ok(AnalysisRow {
                        image_ref: row.get(0)?,
                        timestamp: row.get(1)?,
                        colors: row.get(2)?,
                        pattern: row.get(3)?,
                        style: row.get(4)?,
                        color_validation: row.get(5)?,
                        prediction_validation: row.get(6)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;

            rows.into_iter().map(AnalysisRow::into_report).collect()
        })
        .await
    }
}

/// Raw `analysis_results` row before JSON decoding
struct AnalysisRow {
    image_ref: String,
    timestamp: String,
    colors: String,
    pattern: String,
    style: String,
    color_validation: String,
    prediction_validation: String,
}

impl AnalysisRow {
    fn into_report(self) -> Result<AnalysisReport, StoreError> {
        Ok(AnalysisReport {
            timestamp: parse_timestamp(&self.timestamp)?,
            image_ref: self.image_ref,
            colors: serde_json::from_str(&self.colors)?,
            pattern: serde_json::from_str(&self.pattern)?,
            style: serde_json::from_str(&self.style)?,
            color_validation: serde_json::from_str(&self.color_validation)?,
            prediction_validation: serde_json::from_str(&self.prediction_validation)?,
        })
    }
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| StoreError::Timestamp(value.to_string()))
}

fn run_migrations(conn: &mut Connection) -> Result<(), StoreError> {
    let mut version: i32 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;

    if version > CURRENT_SCHEMA_VERSION {
        return Err(StoreError::Schema {
            found: version,
            supported: CURRENT_SCHEMA_VERSION,
        });
    }
    if version == CURRENT_SCHEMA_VERSION {
        return Ok(());
    }

    let tx = conn.transaction()?;
    while version < CURRENT_SCHEMA_VERSION {
        version += 1;
        apply_migration(&tx, version)?;
        tracing::debug!(version, "Applied schema migration");
    }
    tx.pragma_update(None, "user_version", CURRENT_SCHEMA_VERSION)?;
    tx.commit()?;
    Ok(())
}

fn apply_migration(tx: &Transaction<'_>, version: i32) -> Result<(), StoreError> {
    match version {
        1 => tx.execute_batch(include_str!("schemas/schema_v1.sql"))?,
        _ => {
            return Err(StoreError::Schema {
                found: version,
                supported: CURRENT_SCHEMA_VERSION,
            })
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PredictionResult;
    use dominant_colors::{ColorEntry, ValidationResult, ValidationStatus};
    use std::collections::BTreeMap;

    fn report(image_ref: &str) -> AnalysisReport {
        let mut metrics = BTreeMap::new();
        metrics.insert("percentage_sum".to_string(), 1.0);
        AnalysisReport {
            image_ref: image_ref.to_string(),
            timestamp: Utc::now(),
            colors: vec![
                ColorEntry::new((180, 40, 40), 0.6),
                ColorEntry::new((30, 60, 200), 0.4),
            ],
            pattern: PredictionResult::from_scores([("floral", 0.82), ("plain", 0.18)]).unwrap(),
            style: PredictionResult::from_scores([("casual", 0.55), ("formal", 0.45)]).unwrap(),
            color_validation: ValidationResult::completed(metrics, Vec::new()),
            prediction_validation: ValidationResult::completed(
                BTreeMap::new(),
                vec!["Low style confidence (0.55)".to_string()],
            ),
        }
    }

    #[tokio::test]
    async fn test_analysis_report_roundtrip() {
        let store = SqliteReportStore::open_in_memory().unwrap();
        let original = report("dress.png");

        store.store_analysis_report(&original).await.unwrap();
        let loaded = store.query_reports(None).await.unwrap();

        assert_eq!(loaded, vec![original]);
        assert_eq!(
            loaded[0].prediction_validation.status,
            ValidationStatus::Warning
        );
    }

    #[tokio::test]
    async fn test_query_filter_and_order() {
        let store = SqliteReportStore::open_in_memory().unwrap();
        for image_ref in ["a.png", "b.png", "a.png"] {
            store.store_analysis_report(&report(image_ref)).await.unwrap();
        }

        let all = store.query_reports(None).await.unwrap();
        let refs: Vec<&str> = all.iter().map(|r| r.image_ref.as_str()).collect();
        assert_eq!(refs, vec!["a.png", "b.png", "a.png"]);
        assert_eq!(store.query_reports(Some("a.png")).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_cluster_report_roundtrip() {
        let store = SqliteReportStore::open_in_memory().unwrap();
        let mut cluster = ClusterReport::new("summer", vec!["a.png".into()]);
        cluster.individual_reports.push(report("a.png"));

        store.store_cluster_report(&cluster).await.unwrap();

        assert_eq!(store.cluster_reports(Some("summer")).await.unwrap(), vec![cluster]);
        assert!(store.cluster_reports(Some("winter")).await.unwrap().is_empty());
        assert!(store.query_reports(None).await.unwrap().is_empty());
    }

    #[test]
    fn test_migrations_set_user_version() {
        let mut conn = Connection::open_in_memory().unwrap();
        run_migrations(&mut conn).unwrap();
        run_migrations(&mut conn).unwrap();

        let version: i32 = conn
            .pragma_query_value(None, "user_version", |row| row.get(0))
            .unwrap();
        assert_eq!(version, CURRENT_SCHEMA_VERSION);
    }

    #[test]
    fn test_newer_schema_rejected() {
        let mut conn = Connection::open_in_memory().unwrap();
        conn.pragma_update(None, "user_version", 99).unwrap();

        assert!(matches!(
            run_migrations(&mut conn),
            Err(StoreError::Schema { found: 99, .. })
        ));
    }
}
