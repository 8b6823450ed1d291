//! Pixel clustering primitives.
//!
//! [`best_of`] runs k-means several times from different seeds and keeps the
//! run with the lowest inertia. [`silhouette_score`] measures how well the
//! resulting clusters are separated.

mod kmeans;
mod silhouette;

pub use kmeans::{best_of, Clustering, KmeansParams};
pub use silhouette::silhouette_score;
