//! Fabric Lens
//!
//! Dominant color, pattern and style analysis for fashion images and named
//! collections of images. The color clustering core lives in the
//! `dominant-colors` crate; this library adds ingestion, orchestration,
//! aggregation, persistence and reporting, and is exposed for integration
//! testing.

pub mod error;
pub mod models;
pub mod rendering;
pub mod services;
