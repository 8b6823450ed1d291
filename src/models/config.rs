use std::path::Path;
use std::time::Duration;

use dominant_colors::{ExtractorOptions, ValidatorOptions};
use serde::{Deserialize, Serialize};

use crate::services::ingestor::{Backoff, RetryPolicy};

/// Application configuration loaded from the YAML file named by `CONFIG_FILE`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Number of dominant colors extracted per image (k)
    pub palette_size: usize,

    pub ingest: IngestConfig,

    pub extraction: ExtractorOptions,

    pub validation: ValidatorOptions,

    pub prediction: PredictionConfig,

    pub cluster: ClusterConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            palette_size: 5,
            ingest: IngestConfig::default(),
            extraction: ExtractorOptions::default(),
            validation: ValidatorOptions::default(),
            prediction: PredictionConfig::default(),
            cluster: ClusterConfig::default(),
        }
    }
}

/// Retry and timeout settings for image fetching
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Total attempts per image, including the first
    pub max_retries: u32,

    /// Per-attempt timeout in seconds
    pub timeout_secs: u64,

    /// Base delay between attempts in milliseconds
    pub retry_delay_ms: u64,

    pub backoff: Backoff,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            timeout_secs: 30,
            retry_delay_ms: 1000,
            backoff: Backoff::Fixed,
        }
    }
}

impl IngestConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_retries,
            delay: Duration::from_millis(self.retry_delay_ms),
            backoff: self.backoff,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictionConfig {
    /// Confidences below this raise a warning
    pub confidence_threshold: f64,
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.6,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    /// Images analyzed concurrently within one cluster
    pub workers: usize,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self { workers: 1 }
    }
}

impl ClusterConfig {
    /// Worker count clamped to at least one.
    pub fn workers(&self) -> usize {
        self.workers.max(1)
    }
}

impl AppConfig {
    /// Validator settings sharing the extraction downscale
    pub fn validator_options(&self) -> ValidatorOptions {
        self.validation.for_extractor(&self.extraction)
    }

    /// Load configuration from the path in `CONFIG_FILE`, or defaults if unset
    pub fn from_env() -> Self {
        match std::env::var("CONFIG_FILE") {
            Ok(path) => Self::load(Path::new(&path)),
            Err(_) => {
                tracing::debug!("CONFIG_FILE not set, using defaults");
                Self::default()
            }
        }
    }

    /// Load configuration from a YAML file, falling back to defaults
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str::<Self>(&content) {
                Ok(config) => {
                    tracing::info!(
                        path = %path.display(),
                        palette_size = config.palette_size,
                        workers = config.cluster.workers(),
                        "Loaded configuration"
                    );
                    config
                }
                Err(e) => {
                    tracing::warn!(
                        %e,
                        path = %path.display(),
                        "Failed to parse config, using defaults"
                    );
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(
                    %e,
                    path = %path.display(),
                    "Failed to read config, using defaults"
                );
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.palette_size, 5);
        assert_eq!(config.ingest.max_retries, 3);
        assert_eq!(config.ingest.timeout(), Duration::from_secs(30));
        assert_eq!(config.extraction.max_size, 500);
        assert_eq!(config.extraction.n_init, 10);
        assert_eq!(config.validation.sample_size, 500);
        assert_eq!(config.validation.n_init, 3);
        assert_eq!(config.prediction.confidence_threshold, 0.6);
        assert_eq!(config.cluster.workers(), 1);
    }

    #[test]
    fn test_retry_policy_from_ingest_config() {
        let policy = IngestConfig::default().retry_policy();

        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.delay, Duration::from_millis(1000));
        assert_eq!(policy.backoff, Backoff::Fixed);
    }

    #[test]
    fn test_workers_clamped() {
        let cluster = ClusterConfig { workers: 0 };
        assert_eq!(cluster.workers(), 1);
    }

    #[test]
    fn test_deserialize_partial_config() {
        let yaml = r#"
palette_size: 3
ingest:
  max_retries: 5
  backoff: exponential
validation:
  sample_size: 1000
  n_init: 10
cluster:
  workers: 4
"#;

        let config: AppConfig = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.palette_size, 3);
        assert_eq!(config.ingest.max_retries, 5);
        assert_eq!(config.ingest.timeout_secs, 30);
        assert_eq!(config.ingest.backoff, Backoff::Exponential);
        assert_eq!(config.validation.sample_size, 1000);
        assert_eq!(config.validation.n_init, 10);
        assert_eq!(config.validation.silhouette_threshold, 0.5);
        assert_eq!(config.extraction, ExtractorOptions::default());
        assert_eq!(config.cluster.workers(), 4);
    }

    #[test]
    fn test_validator_follows_extraction_downscale() {
        let yaml = r#"
extraction:
  max_size: 100
validation:
  max_size: 900
  sample_size: 200
"#;

        let config: AppConfig = serde_yaml::from_str(yaml).unwrap();
        let options = config.validator_options();

        assert_eq!(options.max_size, 100);
        assert_eq!(options.sample_size, 200);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let config = AppConfig::load(Path::new("/nonexistent/fabric-lens.yaml"));
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_load_malformed_file_uses_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "palette_size: [not, a, number]").unwrap();

        let config = AppConfig::load(file.path());
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "palette_size: 7\nprediction:\n  confidence_threshold: 0.8").unwrap();

        let config = AppConfig::load(file.path());
        assert_eq!(config.palette_size, 7);
        assert_eq!(config.prediction.confidence_threshold, 0.8);
    }
}
