// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Clustering service implementation.
*/

use super::run_blocking;
use crate::traits::ClusteringService;
use crate::types::*;
use async_trait::async_trait;
use chrono::Utc;
use odyssey_clustering::{ClusteringPipeline, ClusteringSettings, PipelineGuard, TermMatrix};
use odyssey_store::StudyClusterWriter;
use std::sync::Arc;
use tracing::{debug, info};

/// Default implementation of ClusteringService
pub struct ClusteringServiceImpl {
    writer: Arc<dyn StudyClusterWriter>,
    pipeline: Arc<ClusteringPipeline>,
    k_candidates: Vec<usize>,
}

impl ClusteringServiceImpl {
    pub fn new(
        writer: Arc<dyn StudyClusterWriter>,
        settings: ClusteringSettings,
        k_candidates: Vec<usize>,
    ) -> Self {
        Self {
            writer,
            pipeline: Arc::new(ClusteringPipeline::new(settings)),
            k_candidates,
        }
    }
}

#[async_trait]
impl ClusteringService for ClusteringServiceImpl {
    async fn variance_profile(
        &self,
        matrix: Arc<TermMatrix>,
        dims_candidates: Vec<usize>,
    ) -> ServiceResult<Vec<VarianceProfileEntry>> {
        debug!(
            target: "odyssey-services",
            "Variance profile over {} candidates",
            dims_candidates.len()
        );

        let pipeline = self.pipeline.clone();
        run_blocking(move || {
            let profile = pipeline.variance_profile(&matrix, &dims_candidates)?;
            Ok(profile
                .into_iter()
                .map(|(dims, explained_variance)| VarianceProfileEntry {
                    dims,
                    explained_variance,
                })
                .collect())
        })
        .await
    }

    async fn elbow(
        &self,
        matrix: Arc<TermMatrix>,
        k_candidates: Option<Vec<usize>>,
    ) -> ServiceResult<ElbowSummary> {
        let k_candidates = k_candidates.unwrap_or_else(|| self.k_candidates.clone());
        debug!(target: "odyssey-services", "Elbow report over k = {:?}", k_candidates);

        let pipeline = self.pipeline.clone();
        run_blocking(move || {
            let reduction = pipeline.reduce(&matrix)?;
            let report = pipeline.elbow(&reduction, &k_candidates)?;
            Ok(ElbowSummary::from(&report))
        })
        .await
    }

    async fn assign(
        &self,
        matrix: Arc<TermMatrix>,
        k: usize,
    ) -> ServiceResult<ClusteringRunSummary> {
        info!(target: "odyssey-services", "Starting clustering run with k = {}", k);

        let pipeline = self.pipeline.clone();
        let writer = self.writer.clone();
        let started_at = Utc::now();
        run_blocking(move || {
            let (assignment, applied) = pipeline.run_and_apply(&matrix, k, writer.as_ref())?;
            Ok(ClusteringRunSummary::new(k, assignment.len(), applied, started_at))
        })
        .await
    }

    async fn is_running(&self) -> ServiceResult<bool> {
        Ok(PipelineGuard::is_running())
    }
}
