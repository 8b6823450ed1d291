/// Silhouette coefficient for a single point.
fn silhouette_coefficient(a_i: f64, b_i: f64) -> f64 {
    let max_ab = a_i.max(b_i);
    if max_ab == 0.0 {
        0.0
    } else {
        (b_i - a_i) / max_ab
    }
}

/// Mean silhouette coefficient of a labelled point set.
///
/// For each point, `a` is the mean Euclidean distance to the other members of
/// its cluster and `b` the smallest mean distance to the members of any other
/// cluster; the point scores `(b - a) / max(a, b)`. The result lies in
/// `[-1, 1]`, higher meaning better separated clusters.
///
/// Points in singleton clusters score 0. Fewer than two non-empty clusters
/// (or fewer than two points) give 0.
///
/// # Panics
///
/// Panics if `points` and `labels` have different lengths.
pub fn silhouette_score(points: &[[f32; 3]], labels: &[usize]) -> f64 {
    assert_eq!(points.len(), labels.len(), "points and labels must align");

    let n_samples = points.len();
    if n_samples < 2 {
        return 0.0;
    }

    let n_labels = labels.iter().max().map_or(0, |&m| m + 1);
    let mut sizes = vec![0usize; n_labels];
    for &label in labels {
        sizes[label] += 1;
    }
    if sizes.iter().filter(|&&s| s > 0).count() < 2 {
        return 0.0;
    }

    let mut total = 0.0;
    let mut sums = vec![0.0f64; n_labels];
    for i in 0..n_samples {
        sums.iter_mut().for_each(|s| *s = 0.0);
        for j in 0..n_samples {
            if i != j {
                sums[labels[j]] += distance(&points[i], &points[j]);
            }
        }

        let own = labels[i];
        if sizes[own] < 2 {
            continue;
        }
        let a_i = sums[own] / (sizes[own] - 1) as f64;
        let b_i = (0..n_labels)
            .filter(|&c| c != own && sizes[c] > 0)
            .map(|c| sums[c] / sizes[c] as f64)
            .fold(f64::INFINITY, f64::min);

        total += silhouette_coefficient(a_i, b_i);
    }

    total / n_samples as f64
}

fn distance(a: &[f32; 3], b: &[f32; 3]) -> f64 {
    super::kmeans::squared_distance(a, b).sqrt()
}
