use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dominant_colors::{ColorNameTable, ShadeModifierStripper};
use fabric_lens::models::AppConfig;
use fabric_lens::rendering::{render_analysis_report, render_cluster_report};
use fabric_lens::services::{
    list_image_files, AnalysisOrchestrator, ClusterAggregator, ImageIngestor, ReportStore,
    SqliteReportStore, StaticPredictor,
};

const DEFAULT_DATABASE_PATH: &str = "fabric_lens.db";

#[derive(Parser)]
#[command(name = "fabric-lens")]
#[command(about = "Dominant color, pattern and style analysis for fashion images")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a single image and print the report as JSON
    Analyze {
        /// Image URL, file:// URL or local path
        image_ref: String,

        /// Also write a plain-text report to this file
        #[arg(short, long)]
        report_file: Option<PathBuf>,
    },
    /// Analyze a named collection of images and print the cluster report as JSON
    Cluster {
        /// Cluster name
        name: String,

        /// Image URLs, file:// URLs or local paths
        image_refs: Vec<String>,

        /// Add every .jpg/.jpeg/.png file of this folder
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// Also write a plain-text report to this file
        #[arg(short, long)]
        report_file: Option<PathBuf>,
    },
    /// List stored analysis reports as JSON
    Query {
        /// Only reports for this image reference
        #[arg(short, long)]
        image_ref: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Analyze {
            image_ref,
            report_file,
        }) => {
            init_logging();
            run_analyze_command(&image_ref, report_file.as_deref()).await
        }
        Some(Commands::Cluster {
            name,
            image_refs,
            dir,
            report_file,
        }) => {
            init_logging();
            run_cluster_command(&name, image_refs, dir.as_deref(), report_file.as_deref()).await
        }
        Some(Commands::Query { image_ref }) => {
            init_logging();
            run_query_command(image_ref.as_deref()).await
        }
        None => {
            run_status_command();
            Ok(())
        }
    }
}

fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fabric_lens=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();
}

fn database_path() -> PathBuf {
    std::env::var("DATABASE_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATABASE_PATH))
}

fn open_store() -> anyhow::Result<Arc<SqliteReportStore>> {
    let path = database_path();
    let store = SqliteReportStore::open(&path)
        .with_context(|| format!("failed to open database {}", path.display()))?;
    tracing::debug!(path = %path.display(), "Database ready");
    Ok(Arc::new(store))
}

fn build_orchestrator(config: &AppConfig) -> anyhow::Result<AnalysisOrchestrator> {
    let ingestor = ImageIngestor::from_config(&config.ingest);
    Ok(AnalysisOrchestrator::new(config, ingestor, open_store()?))
}

fn write_report_file(path: &Path, text: &str) -> anyhow::Result<()> {
    std::fs::write(path, text)
        .with_context(|| format!("failed to write report to {}", path.display()))?;
    tracing::info!(path = %path.display(), "Report written");
    Ok(())
}

async fn run_analyze_command(image_ref: &str, report_file: Option<&Path>) -> anyhow::Result<()> {
    let config = AppConfig::from_env();
    let orchestrator = build_orchestrator(&config)?;

    let report = orchestrator
        .try_analyze(image_ref, Arc::new(StaticPredictor::default()))
        .await
        .with_context(|| format!("analysis of {image_ref} failed"))?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    if let Some(path) = report_file {
        write_report_file(path, &render_analysis_report(&report))?;
    }
    Ok(())
}

async fn run_cluster_command(
    name: &str,
    mut image_refs: Vec<String>,
    dir: Option<&Path>,
    report_file: Option<&Path>,
) -> anyhow::Result<()> {
    if let Some(dir) = dir {
        let files = list_image_files(dir)
            .with_context(|| format!("failed to list images in {}", dir.display()))?;
        image_refs.extend(files.iter().map(|p| p.display().to_string()));
    }
    if image_refs.is_empty() {
        anyhow::bail!("no images given: pass image references or --dir");
    }

    let config = AppConfig::from_env();
    let orchestrator = Arc::new(build_orchestrator(&config)?);
    let aggregator = ClusterAggregator::new(
        orchestrator,
        Arc::new(ColorNameTable::css3()),
        Arc::new(ShadeModifierStripper::default()),
    )
    .with_workers(config.cluster.workers());

    let report = aggregator
        .analyze_cluster(&image_refs, name, Arc::new(StaticPredictor::default()))
        .await;

    println!("{}", serde_json::to_string_pretty(&report)?);
    if let Some(path) = report_file {
        write_report_file(path, &render_cluster_report(&report))?;
    }
    Ok(())
}

async fn run_query_command(image_ref: Option<&str>) -> anyhow::Result<()> {
    let store = open_store()?;
    let reports = store
        .query_reports(image_ref)
        .await
        .context("failed to query reports")?;
    println!("{}", serde_json::to_string_pretty(&reports)?);
    Ok(())
}

fn run_status_command() {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    let config_file = std::env::var("CONFIG_FILE").ok();
    let database = std::env::var("DATABASE_PATH").ok();

    println!("Fabric Lens v{VERSION}");
    println!("Dominant color, pattern and style analysis for fashion images\n");

    println!("Environment Variables:");
    println!(
        "  CONFIG_FILE   = {}",
        config_file.as_deref().unwrap_or("(not set)")
    );
    println!(
        "  DATABASE_PATH = {}",
        database
            .as_deref()
            .unwrap_or(&format!("{DEFAULT_DATABASE_PATH} (default)"))
    );
    println!(
        "  RUST_LOG      = {}",
        std::env::var("RUST_LOG").as_deref().unwrap_or("fabric_lens=info (default)")
    );

    println!("\nEffective Configuration:");
    let config = AppConfig::from_env();
    match serde_yaml::to_string(&config) {
        Ok(yaml) => {
            for line in yaml.lines() {
                println!("  {line}");
            }
        }
        Err(e) => println!("  (failed to render: {e})"),
    }

    println!("\nCommands:");
    println!("  fabric-lens analyze <IMAGE_REF>          Analyze one image");
    println!("  fabric-lens cluster <NAME> [IMAGE_REF..]  Analyze a collection (--dir for a folder)");
    println!("  fabric-lens query [--image-ref REF]       List stored reports");
    println!("\nRun 'fabric-lens --help' for more options.");
}
