// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Truncated SVD (latent semantic analysis).

Randomized range finder with subspace iterations, followed by a
Rayleigh-Ritz step on the small Gram matrix (`nalgebra::SymmetricEigen`):

```text
Q  = orth(X * Omega)                       m x l
repeat: Q = orth(X * orth(X^T * Q))
B  = Q^T * X                               l x n
B * B^T = U * diag(s^2) * U^T              (symmetric eigen)
V  = B^T * U / s                           components, descending s
```

The input is not centered, matching LSA on sparse term frequencies.
*/

use crate::error::{ClusteringError, ClusteringResult};
use nalgebra::{DMatrix, SymmetricEigen};
use ndarray::{s, Array1, Array2, ArrayView2, Axis};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

const OVERSAMPLES: usize = 10;
const EPS: f64 = 1e-12;

/// Fitted decomposition
#[derive(Debug, Clone)]
pub struct TruncatedSvd {
    /// `dims x n_terms`, rows ordered by descending singular value
    components: Array2<f64>,
    singular_values: Array1<f64>,
    explained_variance_ratio: Array1<f64>,
}

impl TruncatedSvd {
    /// Fit `dims` components to `x` (rows are samples)
    pub fn fit(
        x: ArrayView2<'_, f64>,
        dims: usize,
        iterations: usize,
        seed: u64,
    ) -> ClusteringResult<Self> {
        let (rows, cols) = x.dim();
        if rows == 0 || cols == 0 {
            return Err(ClusteringError::EmptyMatrix);
        }
        let max = rows.min(cols);
        if dims == 0 || dims > max {
            return Err(ClusteringError::InvalidDimensions { dims, max });
        }

        let width = (dims + OVERSAMPLES).min(max);
        let mut rng = StdRng::seed_from_u64(seed);
        let omega = Array2::from_shape_fn((cols, width), |_| rng.gen_range(-1.0..1.0));

        let mut q = orthonormalize(x.dot(&omega));
        for _ in 0..iterations {
            let z = orthonormalize(x.t().dot(&q));
            q = orthonormalize(x.dot(&z));
        }

        let b = q.t().dot(&x);
        let gram = b.dot(&b.t());
        let (eigenvalues, eigenvectors) = symmetric_eigen(&gram);

        let mut components = Array2::zeros((dims, cols));
        let mut singular_values = Array1::zeros(dims);
        for i in 0..dims {
            let sigma = eigenvalues[i].max(0.0).sqrt();
            singular_values[i] = sigma;
            if sigma > EPS {
                let v = b.t().dot(&eigenvectors.column(i)) / sigma;
                components.row_mut(i).assign(&v);
            }
        }

        let mut svd = Self {
            components,
            singular_values,
            explained_variance_ratio: Array1::zeros(dims),
        };
        svd.explained_variance_ratio = svd.variance_ratio(x);
        debug!(
            target: "odyssey-clustering",
            "Truncated SVD: {} -> {} dims, {:.1}% variance retained",
            cols,
            dims,
            svd.total_explained_variance() * 100.0
        );
        Ok(svd)
    }

    pub fn transform(&self, x: ArrayView2<'_, f64>) -> Array2<f64> {
        x.dot(&self.components.t())
    }

    pub fn components(&self) -> &Array2<f64> {
        &self.components
    }

    pub fn singular_values(&self) -> &Array1<f64> {
        &self.singular_values
    }

    /// Per-component share of the total column variance of the input
    pub fn explained_variance_ratio(&self) -> &Array1<f64> {
        &self.explained_variance_ratio
    }

    pub fn total_explained_variance(&self) -> f64 {
        self.explained_variance_ratio.sum()
    }

    /// Variance of each projected column over the summed column variance of `x`
    fn variance_ratio(&self, x: ArrayView2<'_, f64>) -> Array1<f64> {
        let total: f64 = column_variances(x).sum();
        let projected = column_variances(self.transform(x).view());
        if total <= 0.0 {
            return Array1::zeros(projected.len());
        }
        projected / total
    }
}

/// Population variance of every column
fn column_variances(x: ArrayView2<'_, f64>) -> Array1<f64> {
    let rows = x.nrows().max(1) as f64;
    let mean = x.sum_axis(Axis(0)) / rows;
    let mut variances = Array1::zeros(x.ncols());
    for row in x.rows() {
        let diff = &row - &mean;
        variances += &(&diff * &diff);
    }
    variances / rows
}

/// Modified Gram-Schmidt over columns. Columns that vanish are zeroed.
fn orthonormalize(mut a: Array2<f64>) -> Array2<f64> {
    let cols = a.ncols();
    for j in 0..cols {
        for k in 0..j {
            let (done, mut rest) = a.view_mut().split_at(Axis(1), j);
            let qk = done.column(k);
            let mut col = rest.column_mut(0);
            let projection = qk.dot(&col);
            col.scaled_add(-projection, &qk);
        }
        let mut col = a.column_mut(j);
        let norm = col.dot(&col).sqrt();
        if norm > EPS {
            col /= norm;
        } else {
            col.fill(0.0);
        }
    }
    a
}

/// Eigen-decomposition of the small symmetric Gram matrix.
/// Returns eigenvalues in descending order with matching eigenvector columns.
pub(crate) fn symmetric_eigen(a: &Array2<f64>) -> (Array1<f64>, Array2<f64>) {
    let n = a.nrows();
    let eigen = SymmetricEigen::new(DMatrix::from_fn(n, n, |i, j| a[[i, j]]));

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&i, &j| eigen.eigenvalues[j].total_cmp(&eigen.eigenvalues[i]));

    let eigenvalues = Array1::from_iter(order.iter().map(|&i| eigen.eigenvalues[i]));
    let eigenvectors = Array2::from_shape_fn((n, n), |(row, col)| {
        eigen.eigenvectors[(row, order[col])]
    });
    (eigenvalues, eigenvectors)
}

/// Cumulative explained variance for each candidate dimensionality, from a
/// single decomposition at the largest feasible candidate.
pub fn variance_profile(
    x: ArrayView2<'_, f64>,
    dims_candidates: &[usize],
    iterations: usize,
    seed: u64,
) -> ClusteringResult<Vec<(usize, f64)>> {
    let max = x.nrows().min(x.ncols());
    let largest = dims_candidates
        .iter()
        .copied()
        .filter(|&d| d > 0 && d <= max)
        .max()
        .ok_or(ClusteringError::InvalidDimensions {
            dims: dims_candidates.iter().copied().max().unwrap_or(0),
            max,
        })?;

    let svd = TruncatedSvd::fit(x, largest, iterations, seed)?;
    let ratios = svd.explained_variance_ratio();
    Ok(dims_candidates
        .iter()
        .copied()
        .filter(|&d| d > 0 && d <= largest)
        .map(|d| (d, ratios.slice(s![..d]).sum()))
        .collect())
}
