pub mod text_report;

pub use text_report::{render_analysis_report, render_cluster_report};
