use kmeans_colors::get_kmeans;
use palette::Srgb;
use serde::{Deserialize, Serialize};

/// Tuning for the repeated k-means runs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KmeansParams {
    /// Number of independently seeded runs; the lowest-inertia run wins.
    pub n_init: usize,
    /// Iteration cap per run.
    pub max_iter: usize,
    /// Centroid movement (squared, unit RGB cube) below which a run stops.
    pub converge: f32,
    /// Seed of the first run; run `i` uses `seed + i`.
    pub seed: u64,
}

impl Default for KmeansParams {
    fn default() -> Self {
        Self {
            n_init: 10,
            max_iter: 20,
            converge: 1e-4,
            seed: 42,
        }
    }
}

/// Best clustering found over all runs.
#[derive(Debug, Clone, PartialEq)]
pub struct Clustering {
    /// Mean color of each cluster, 0.0..=255.0 per channel.
    pub centroids: Vec<[f32; 3]>,
    /// Cluster index of every input point.
    pub labels: Vec<usize>,
    /// Within-cluster sum of squared distances (0..=255 scale).
    pub inertia: f64,
}

impl Clustering {
    /// Points assigned to each centroid.
    pub fn counts(&self) -> Vec<usize> {
        let mut counts = vec![0usize; self.centroids.len()];
        for &label in &self.labels {
            if let Some(count) = counts.get_mut(label) {
                *count += 1;
            }
        }
        counts
    }
}

/// Cluster `points` (0..=255 RGB) into `k` groups.
///
/// Returns `None` when `k` is 0 or above 255, or when there are fewer points
/// than clusters.
pub fn best_of(points: &[[f32; 3]], k: usize, params: &KmeansParams) -> Option<Clustering> {
    if k == 0 || k > u8::MAX as usize || points.len() < k {
        return None;
    }

    let unit: Vec<Srgb> = points
        .iter()
        .map(|p| Srgb::new(p[0] / 255.0, p[1] / 255.0, p[2] / 255.0))
        .collect();

    let mut best: Option<Clustering> = None;
    for run in 0..params.n_init.max(1) {
        let seed = params.seed.wrapping_add(run as u64);
        let result = get_kmeans(k, params.max_iter, params.converge, false, &unit, seed);

        let centroids: Vec<[f32; 3]> = result
            .centroids
            .iter()
            .map(|c| [c.red * 255.0, c.green * 255.0, c.blue * 255.0])
            .collect();
        let labels: Vec<usize> = result.indices.iter().map(|&i| i as usize).collect();
        let inertia = inertia(points, &centroids, &labels);

        let improves = match &best {
            Some(current) => inertia < current.inertia,
            None => true,
        };
        if improves {
            best = Some(Clustering {
                centroids,
                labels,
                inertia,
            });
        }
    }
    best
}

fn inertia(points: &[[f32; 3]], centroids: &[[f32; 3]], labels: &[usize]) -> f64 {
    points
        .iter()
        .zip(labels)
        .filter_map(|(p, &label)| centroids.get(label).map(|c| squared_distance(p, c)))
        .sum()
}

pub(crate) fn squared_distance(a: &[f32; 3], b: &[f32; 3]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let d = *x as f64 - *y as f64;
            d * d
        })
        .sum()
}
