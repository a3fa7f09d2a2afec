//! Bounded Lloyd's algorithm with deterministic seeding.
//!
//! Centroids seed from the first k input vectors rather than a random
//! draw, so a run over the same snapshot always produces the same
//! clusters. Assignment quality is therefore sensitive to input order;
//! callers feed patterns in the store's stable listing order.

use mend_core::constants::{KMEANS_MAX_CLUSTERS, KMEANS_MIN_CLUSTERS};
use rayon::prelude::*;

/// Number of clusters for n eligible patterns: floor(n/3) clamped to
/// [2, 5], never more than n itself.
pub fn cluster_count(n: usize) -> usize {
    if n == 0 {
        return 0;
    }
    (n / 3).clamp(KMEANS_MIN_CLUSTERS, KMEANS_MAX_CLUSTERS).min(n)
}

/// Final assignment of each input vector plus the converged centroids.
#[derive(Debug, Clone)]
pub struct KmeansResult {
    /// `assignments[i]` is the cluster index of `vectors[i]`.
    pub assignments: Vec<usize>,
    pub centroids: Vec<Vec<f64>>,
}

/// Runs at most `max_iterations` assignment passes of Lloyd's algorithm,
/// stopping early once assignments are stable.
///
/// Every vector is assigned to exactly one cluster. Clusters may end up
/// empty; an empty cluster keeps its previous centroid.
pub fn kmeans(vectors: &[Vec<f64>], k: usize, max_iterations: usize) -> KmeansResult {
    debug_assert!(k > 0 && k <= vectors.len());

    let mut centroids: Vec<Vec<f64>> = vectors.iter().take(k).cloned().collect();
    let mut assignments = assign_all(vectors, &centroids);

    for _ in 1..max_iterations {
        update_centroids(vectors, &assignments, &mut centroids);
        let next = assign_all(vectors, &centroids);
        if next == assignments {
            break;
        }
        assignments = next;
    }

    KmeansResult {
        assignments,
        centroids,
    }
}

fn assign_all(vectors: &[Vec<f64>], centroids: &[Vec<f64>]) -> Vec<usize> {
    vectors
        .par_iter()
        .map(|vector| nearest_centroid(vector, centroids))
        .collect()
}

/// Index of the nearest centroid; ties break toward the lower index.
/// Squared distance has the same argmin as Euclidean distance.
fn nearest_centroid(vector: &[f64], centroids: &[Vec<f64>]) -> usize {
    let mut best = 0;
    let mut best_distance = f64::INFINITY;
    for (index, centroid) in centroids.iter().enumerate() {
        let distance = squared_distance(vector, centroid);
        if distance < best_distance {
            best_distance = distance;
            best = index;
        }
    }
    best
}

fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum()
}

fn update_centroids(vectors: &[Vec<f64>], assignments: &[usize], centroids: &mut [Vec<f64>]) {
    let dims = vectors.first().map_or(0, Vec::len);
    let mut sums = vec![vec![0.0; dims]; centroids.len()];
    let mut counts = vec![0usize; centroids.len()];

    for (vector, &cluster) in vectors.iter().zip(assignments) {
        counts[cluster] += 1;
        for (dim, value) in vector.iter().enumerate() {
            sums[cluster][dim] += value;
        }
    }
    for (cluster, centroid) in centroids.iter_mut().enumerate() {
        if counts[cluster] == 0 {
            continue;
        }
        for (dim, sum) in sums[cluster].iter().enumerate() {
            centroid[dim] = sum / counts[cluster] as f64;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cluster_count_follows_the_clamp() {
        assert_eq!(cluster_count(0), 0);
        assert_eq!(cluster_count(1), 1);
        assert_eq!(cluster_count(2), 2);
        assert_eq!(cluster_count(5), 2);
        assert_eq!(cluster_count(6), 2);
        assert_eq!(cluster_count(9), 3);
        assert_eq!(cluster_count(12), 4);
        assert_eq!(cluster_count(20), 5);
        assert_eq!(cluster_count(500), 5);
    }

    #[test]
    fn single_vector_forms_a_single_cluster() {
        let vectors = vec![vec![100.0, 95.0, 95.0, 3.0]];
        let result = kmeans(&vectors, 1, 10);
        assert_eq!(result.assignments, vec![0]);
        assert_eq!(result.centroids.len(), 1);
    }

    #[test]
    fn every_vector_is_assigned_exactly_once() {
        let vectors: Vec<Vec<f64>> = (0..10)
            .map(|i| vec![i as f64, (i * 7 % 10) as f64, 50.0, 3.0])
            .collect();
        let result = kmeans(&vectors, 3, 10);
        assert_eq!(result.assignments.len(), vectors.len());
        assert!(result.assignments.iter().all(|&c| c < 3));
    }

    #[test]
    fn well_separated_groups_land_in_different_clusters() {
        let vectors = vec![
            vec![1.0, 10.0, 50.0, 3.0],
            vec![200.0, 90.0, 95.0, 5.0],
            vec![2.0, 12.0, 52.0, 3.0],
            vec![198.0, 88.0, 93.0, 5.0],
        ];
        let result = kmeans(&vectors, 2, 10);
        assert_eq!(result.assignments[0], result.assignments[2]);
        assert_eq!(result.assignments[1], result.assignments[3]);
        assert_ne!(result.assignments[0], result.assignments[1]);
    }

    #[test]
    fn reruns_over_the_same_input_are_identical() {
        let vectors: Vec<Vec<f64>> = (0..15)
            .map(|i| vec![(i * 13 % 40) as f64, (i * 29 % 100) as f64, 60.0, 1.0])
            .collect();
        let first = kmeans(&vectors, 5, 10);
        let second = kmeans(&vectors, 5, 10);
        assert_eq!(first.assignments, second.assignments);
        assert_eq!(first.centroids, second.centroids);
    }
}
