// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
# Odyssey Clustering

Offline batch job assigning every study to a topic cluster:

1. Load a study x term frequency matrix ([`TermMatrix`])
2. Inspect retained variance per dimensionality ([`variance_profile`])
3. Reduce with truncated SVD and normalize rows ([`ClusteringPipeline::reduce`])
4. Report the elbow over candidate k ([`elbow_report`]); the operator picks k
5. Assign with the chosen k and store the result ([`StudyClusterAssignment`])

Only one run may write assignments at a time ([`PipelineGuard`]). Readers
may observe a partially applied assignment while a run is in progress.
*/

pub mod assignment;
pub mod elbow;
pub mod error;
pub mod guard;
pub mod kmeans;
pub mod matrix;
pub mod pipeline;
pub mod svd;

pub use assignment::{ApplySummary, StudyClusterAssignment};
pub use elbow::{elbow_report, total_sum_of_squares, ElbowEntry, ElbowReport};
pub use error::{ClusteringError, ClusteringResult};
pub use guard::PipelineGuard;
pub use kmeans::{kmeans, KMeansFit, KMeansSettings};
pub use matrix::TermMatrix;
pub use pipeline::{
    normalize_rows, ClusteringOutcome, ClusteringPipeline, ClusteringSettings, Reduction,
};
pub use svd::{variance_profile, TruncatedSvd};
