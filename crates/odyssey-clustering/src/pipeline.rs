// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
End-to-end study clustering.

```text
TermMatrix ─► TruncatedSvd(dims) ─► row L2 normalization ─► reduced vectors
reduced ─► elbow_report(k_candidates) ─► operator picks k
reduced ─► kmeans(k) ─► StudyClusterAssignment (row order = matrix pmid order)
```
*/

use crate::assignment::{ApplySummary, StudyClusterAssignment};
use crate::elbow::{elbow_report, ElbowReport};
use crate::error::{ClusteringError, ClusteringResult};
use crate::guard::PipelineGuard;
use crate::kmeans::{kmeans, KMeansSettings};
use crate::matrix::TermMatrix;
use crate::svd::{variance_profile, TruncatedSvd};
use ndarray::Array2;
use odyssey_store::StudyClusterWriter;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClusteringSettings {
    /// Target dimensionality of the reduction
    pub dims: usize,
    pub svd_iterations: usize,
    pub kmeans: KMeansSettings,
}

impl Default for ClusteringSettings {
    fn default() -> Self {
        Self {
            dims: 200,
            svd_iterations: 7,
            kmeans: KMeansSettings::default(),
        }
    }
}

/// Reduced, row-normalized study vectors
#[derive(Debug, Clone)]
pub struct Reduction {
    pub vectors: Array2<f64>,
    /// Share of the input variance retained by the reduction
    pub explained_variance: f64,
}

/// Everything produced by one run
#[derive(Debug, Clone)]
pub struct ClusteringOutcome {
    pub reduction: Reduction,
    pub report: ElbowReport,
    pub chosen_k: usize,
    pub assignment: StudyClusterAssignment,
}

pub struct ClusteringPipeline {
    settings: ClusteringSettings,
}

impl ClusteringPipeline {
    pub fn new(settings: ClusteringSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &ClusteringSettings {
        &self.settings
    }

    /// Cumulative explained variance for each candidate dimensionality
    pub fn variance_profile(
        &self,
        matrix: &TermMatrix,
        dims_candidates: &[usize],
    ) -> ClusteringResult<Vec<(usize, f64)>> {
        variance_profile(
            matrix.values(),
            dims_candidates,
            self.settings.svd_iterations,
            self.settings.kmeans.seed,
        )
    }

    /// Project to `dims` components, then scale every row to unit length
    pub fn reduce(&self, matrix: &TermMatrix) -> ClusteringResult<Reduction> {
        let svd = TruncatedSvd::fit(
            matrix.values(),
            self.settings.dims,
            self.settings.svd_iterations,
            self.settings.kmeans.seed,
        )?;
        let mut vectors = svd.transform(matrix.values());
        normalize_rows(&mut vectors);
        let explained_variance = svd.total_explained_variance();
        info!(
            target: "odyssey-clustering",
            "Reduced {} studies to {} dims ({:.1}% variance)",
            matrix.rows(),
            self.settings.dims,
            explained_variance * 100.0
        );
        Ok(Reduction {
            vectors,
            explained_variance,
        })
    }

    pub fn elbow(
        &self,
        reduction: &Reduction,
        k_candidates: &[usize],
    ) -> ClusteringResult<ElbowReport> {
        elbow_report(reduction.vectors.view(), k_candidates, &self.settings.kmeans)
    }

    /// Final k-means with the chosen k, labels aligned with the matrix pmids
    pub fn assign(
        &self,
        matrix: &TermMatrix,
        reduction: &Reduction,
        k: usize,
    ) -> ClusteringResult<StudyClusterAssignment> {
        let fit = kmeans(reduction.vectors.view(), k, &self.settings.kmeans)?;
        StudyClusterAssignment::from_labels(matrix.pmids(), &fit.labels)
    }

    /// Reduce, report the elbow over `k_candidates`, let `choose` pick k
    /// from the report, then assign every study.
    ///
    /// `choose` stands in for the operator; returning `None` aborts the run
    /// with [`ClusteringError::NoSelection`].
    pub fn compute_study_clusters<F>(
        &self,
        matrix: &TermMatrix,
        k_candidates: &[usize],
        choose: F,
    ) -> ClusteringResult<ClusteringOutcome>
    where
        F: FnOnce(&ElbowReport) -> Option<usize>,
    {
        let reduction = self.reduce(matrix)?;
        let report = self.elbow(&reduction, k_candidates)?;
        let chosen_k = choose(&report).ok_or(ClusteringError::NoSelection)?;
        let assignment = self.assign(matrix, &reduction, chosen_k)?;
        info!(
            target: "odyssey-clustering",
            "Assigned {} studies to {} clusters",
            assignment.len(),
            chosen_k
        );
        Ok(ClusteringOutcome {
            reduction,
            report,
            chosen_k,
            assignment,
        })
    }

    /// Assign with a fixed k and store the result, holding the
    /// process-wide pipeline guard for the whole run
    pub fn run_and_apply(
        &self,
        matrix: &TermMatrix,
        k: usize,
        writer: &dyn StudyClusterWriter,
    ) -> ClusteringResult<(StudyClusterAssignment, ApplySummary)> {
        let _guard = PipelineGuard::acquire()?;
        let reduction = self.reduce(matrix)?;
        let assignment = self.assign(matrix, &reduction, k)?;
        let summary = assignment.apply(writer)?;
        Ok((assignment, summary))
    }
}

/// Scale rows to unit L2 norm; all-zero rows are left as they are
pub fn normalize_rows(vectors: &mut Array2<f64>) {
    for mut row in vectors.rows_mut() {
        let norm = row.dot(&row).sqrt();
        if norm > 0.0 {
            row /= norm;
        }
    }
}
