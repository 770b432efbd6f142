// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Offline clustering service trait.

Exposes the operator steps of the clustering pipeline. Choosing k stays with
the caller: the elbow report is advisory and a run only starts once a k is
named.
*/

use crate::types::*;
use async_trait::async_trait;
use odyssey_clustering::TermMatrix;
use std::sync::Arc;

/// Study clustering (transport-agnostic)
#[async_trait]
pub trait ClusteringService: Send + Sync {
    /// Cumulative explained variance for candidate dimensionalities
    ///
    /// # Errors
    /// * `ServiceError::InvalidInput` - Empty matrix or a candidate larger
    ///   than the matrix rank allows
    ///
    async fn variance_profile(
        &self,
        matrix: Arc<TermMatrix>,
        dims_candidates: Vec<usize>,
    ) -> ServiceResult<Vec<VarianceProfileEntry>>;

    /// Reduce the matrix and report the elbow over candidate cluster counts
    ///
    /// # Arguments
    /// * `matrix` - Study x term frequencies
    /// * `k_candidates` - `None` uses the configured candidates
    ///
    async fn elbow(
        &self,
        matrix: Arc<TermMatrix>,
        k_candidates: Option<Vec<usize>>,
    ) -> ServiceResult<ElbowSummary>;

    /// Assign every study of the matrix to one of `k` clusters and store it
    ///
    /// # Errors
    /// * `ServiceError::Busy` - Another run is in progress
    /// * `ServiceError::InvalidInput` - `k` exceeds the number of studies
    ///
    async fn assign(&self, matrix: Arc<TermMatrix>, k: usize)
        -> ServiceResult<ClusteringRunSummary>;

    /// Whether a run currently holds the pipeline
    async fn is_running(&self) -> ServiceResult<bool>;
}
