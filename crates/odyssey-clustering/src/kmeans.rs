// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Lloyd's k-means with k-means++ seeding.

Each of `n_init` restarts uses its own seeded RNG, so results are
reproducible for a given seed. The assignment step runs on the rayon pool.
*/

use crate::error::{ClusteringError, ClusteringResult};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KMeansSettings {
    pub max_iter: usize,
    pub n_init: usize,
    /// Convergence threshold on centroid movement, relative to the mean
    /// column variance of the data
    pub tolerance: f64,
    pub seed: u64,
}

impl Default for KMeansSettings {
    fn default() -> Self {
        Self {
            max_iter: 300,
            n_init: 10,
            tolerance: 1e-4,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone)]
pub struct KMeansFit {
    /// Cluster index of every row, in row order
    pub labels: Vec<usize>,
    pub centroids: Array2<f64>,
    /// Sum of squared distances of rows to their centroid
    pub inertia: f64,
    pub iterations: usize,
}

impl KMeansFit {
    pub fn k(&self) -> usize {
        self.centroids.nrows()
    }
}

/// Cluster the rows of `data` into `k` groups, keeping the best of
/// `n_init` restarts by inertia
pub fn kmeans(
    data: ArrayView2<'_, f64>,
    k: usize,
    settings: &KMeansSettings,
) -> ClusteringResult<KMeansFit> {
    let rows = data.nrows();
    if rows == 0 || data.ncols() == 0 {
        return Err(ClusteringError::EmptyMatrix);
    }
    if k == 0 || k > rows {
        return Err(ClusteringError::InvalidK { k, rows });
    }

    let tolerance = settings.tolerance * mean_variance(data);
    let mut best: Option<KMeansFit> = None;
    for run in 0..settings.n_init.max(1) {
        let mut rng = StdRng::seed_from_u64(settings.seed.wrapping_add(run as u64));
        let fit = lloyd(data, seed_centroids(data, k, &mut rng), settings.max_iter, tolerance);
        if best.as_ref().map_or(true, |b| fit.inertia < b.inertia) {
            best = Some(fit);
        }
    }

    let best = best.ok_or(ClusteringError::InvalidK { k, rows })?;
    debug!(
        target: "odyssey-clustering",
        "k-means k={} inertia={:.6} after {} iterations",
        k,
        best.inertia,
        best.iterations
    );
    Ok(best)
}

fn squared_distance(a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum()
}

fn mean_variance(data: ArrayView2<'_, f64>) -> f64 {
    data.var_axis(Axis(0), 0.0).mean().unwrap_or(0.0)
}

/// k-means++: first centroid uniform, then proportional to squared distance
/// from the nearest chosen centroid
fn seed_centroids(data: ArrayView2<'_, f64>, k: usize, rng: &mut StdRng) -> Array2<f64> {
    let rows = data.nrows();
    let mut centroids = Array2::zeros((k, data.ncols()));
    let first = rng.gen_range(0..rows);
    centroids.row_mut(0).assign(&data.row(first));

    let mut nearest: Vec<f64> = data
        .rows()
        .into_iter()
        .map(|row| squared_distance(row, data.row(first)))
        .collect();

    for c in 1..k {
        let total: f64 = nearest.iter().sum();
        let chosen = if total <= f64::EPSILON {
            rng.gen_range(0..rows)
        } else {
            let threshold = rng.gen_range(0.0..total);
            let mut cumulative = 0.0;
            let mut chosen = rows - 1;
            for (i, d) in nearest.iter().enumerate() {
                cumulative += d;
                if cumulative > threshold {
                    chosen = i;
                    break;
                }
            }
            chosen
        };
        centroids.row_mut(c).assign(&data.row(chosen));

        for (i, row) in data.rows().into_iter().enumerate() {
            let d = squared_distance(row, data.row(chosen));
            if d < nearest[i] {
                nearest[i] = d;
            }
        }
    }
    centroids
}

/// Nearest centroid index and squared distance for every row
fn assign(data: ArrayView2<'_, f64>, centroids: &Array2<f64>) -> Vec<(usize, f64)> {
    (0..data.nrows())
        .into_par_iter()
        .map(|i| {
            let row = data.row(i);
            centroids
                .rows()
                .into_iter()
                .enumerate()
                .map(|(c, centroid)| (c, squared_distance(row, centroid)))
                .fold((0, f64::INFINITY), |best, cur| if cur.1 < best.1 { cur } else { best })
        })
        .collect()
}

fn lloyd(
    data: ArrayView2<'_, f64>,
    mut centroids: Array2<f64>,
    max_iter: usize,
    tolerance: f64,
) -> KMeansFit {
    let k = centroids.nrows();
    let mut assignment = assign(data, &centroids);
    let mut iterations = 0;

    for _ in 0..max_iter {
        iterations += 1;
        let mut sums = Array2::<f64>::zeros(centroids.raw_dim());
        let mut counts = vec![0usize; k];
        for (i, (c, _)) in assignment.iter().enumerate() {
            let mut sum = sums.row_mut(*c);
            sum += &data.row(i);
            counts[*c] += 1;
        }

        let mut updated = centroids.clone();
        for c in 0..k {
            if counts[c] > 0 {
                let mean: Array1<f64> = &sums.row(c) / counts[c] as f64;
                updated.row_mut(c).assign(&mean);
            } else {
                // Re-seed an empty cluster with the row farthest from its centroid
                let (far, _) = assignment
                    .iter()
                    .enumerate()
                    .fold((0, f64::NEG_INFINITY), |best, (i, (_, d))| {
                        if *d > best.1 {
                            (i, *d)
                        } else {
                            best
                        }
                    });
                updated.row_mut(c).assign(&data.row(far));
            }
        }

        let shift: f64 = centroids
            .rows()
            .into_iter()
            .zip(updated.rows())
            .map(|(a, b)| squared_distance(a, b))
            .sum();
        centroids = updated;
        assignment = assign(data, &centroids);
        if shift <= tolerance {
            break;
        }
    }

    KMeansFit {
        labels: assignment.iter().map(|(c, _)| *c).collect(),
        inertia: assignment.iter().map(|(_, d)| *d).sum(),
        centroids,
        iterations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn two_blobs() -> Array2<f64> {
        array![
            [0.0, 0.0],
            [0.1, 0.0],
            [0.0, 0.1],
            [10.0, 10.0],
            [10.1, 10.0],
            [10.0, 10.1]
        ]
    }

    #[test]
    fn test_separates_two_blobs() {
        let data = two_blobs();
        let fit = kmeans(data.view(), 2, &KMeansSettings::default()).unwrap();
        assert_eq!(fit.labels[0], fit.labels[1]);
        assert_eq!(fit.labels[1], fit.labels[2]);
        assert_eq!(fit.labels[3], fit.labels[4]);
        assert_ne!(fit.labels[0], fit.labels[3]);
        assert!(fit.inertia < 0.1);
    }

    #[test]
    fn test_same_seed_same_result() {
        let data = two_blobs();
        let settings = KMeansSettings {
            seed: 7,
            ..KMeansSettings::default()
        };
        let a = kmeans(data.view(), 3, &settings).unwrap();
        let b = kmeans(data.view(), 3, &settings).unwrap();
        assert_eq!(a.labels, b.labels);
        assert_eq!(a.inertia, b.inertia);
    }

    #[test]
    fn test_k_equal_to_rows_has_zero_inertia() {
        let data = two_blobs();
        let fit = kmeans(data.view(), 6, &KMeansSettings::default()).unwrap();
        assert!(fit.inertia.abs() < 1e-12);
    }

    #[test]
    fn test_invalid_k() {
        let data = two_blobs();
        assert!(matches!(
            kmeans(data.view(), 0, &KMeansSettings::default()),
            Err(ClusteringError::InvalidK { k: 0, rows: 6 })
        ));
        assert!(matches!(
            kmeans(data.view(), 7, &KMeansSettings::default()),
            Err(ClusteringError::InvalidK { k: 7, rows: 6 })
        ));
    }
}
