// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Study lookup service trait.

Resolves request sources (coordinates, studies, words, topics) to study
sets and projects studies to citations.
*/

use crate::types::*;
use async_trait::async_trait;
use odyssey_query::TreeRequest;
use odyssey_structures::{Citation, ClusterId, Pmid, Study};

/// Study lookup service (transport-agnostic)
#[async_trait]
pub trait StudyService: Send + Sync {
    /// Studies with an activation near a coordinate
    ///
    /// # Arguments
    /// * `x`, `y`, `z` - Center of the search
    /// * `radius` - Half-width of the search cube; `None` matches the
    ///   coordinate exactly. An empty cube is widened until the configured
    ///   maximum radius.
    ///
    /// # Returns
    /// * `Vec<Pmid>` - Matching studies in ascending order
    ///
    /// # Errors
    /// * `ServiceError::EmptyRegion` - Nothing found up to the maximum radius
    /// * `ServiceError::InvalidInput` - Non-finite coordinate or radius
    ///
    async fn studies_near(
        &self,
        x: f64,
        y: f64,
        z: f64,
        radius: Option<f64>,
    ) -> ServiceResult<Vec<Pmid>>;

    /// Studies sharing the topic cluster of a study, the study included
    ///
    /// # Errors
    /// * `ServiceError::NotFound` - Unknown or unclustered study
    ///
    async fn cluster_mates(&self, pmid: Pmid) -> ServiceResult<Vec<Pmid>>;

    /// Studies mentioning a word
    async fn studies_for_word(&self, word: &str) -> ServiceResult<Vec<Pmid>>;

    /// Studies mentioning any word of a topic cluster
    async fn studies_for_topic(&self, cluster_id: ClusterId) -> ServiceResult<Vec<Pmid>>;

    /// Get one study record
    ///
    /// # Errors
    /// * `ServiceError::NotFound` - Unknown pmid
    ///
    async fn get_study(&self, pmid: Pmid) -> ServiceResult<Study>;

    /// Citations of the studies selected by a request, ordered by pmid
    ///
    /// A location request without a radius uses the configured default
    /// radius.
    ///
    async fn citations(&self, request: TreeRequest) -> ServiceResult<Vec<Citation>>;

    /// Distinct activation coordinates of the studies mentioning a word
    async fn locations_for_word(&self, word: &str) -> ServiceResult<WordLocations>;
}
