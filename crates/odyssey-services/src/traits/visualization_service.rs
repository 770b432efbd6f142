// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Visualization payload service trait.

Builds the term hierarchy consumed by the circle-packing view and the
per-vertex intensity vectors consumed by the surface renderer.
*/

use crate::types::*;
use async_trait::async_trait;
use odyssey_query::{IntensitySource, TreeRequest};
use odyssey_structures::{ClusterTree, IntensityMap};

/// Visualization payloads (transport-agnostic)
#[async_trait]
pub trait VisualizationService: Send + Sync {
    /// Build the root -> cluster -> term tree for a request
    ///
    /// # Arguments
    /// * `request` - Source of the study set. A location without a radius
    ///   uses the configured default radius.
    ///
    /// # Returns
    /// * `ClusterTree` - Empty (label only) when the studies carry no terms
    ///
    /// # Errors
    /// * `ServiceError::EmptyRegion` - Location search found nothing
    /// * `ServiceError::NotFound` - Unknown or unclustered study
    /// * `ServiceError::DataInconsistency` - A selected cluster has no leaf
    ///
    async fn tree(&self, request: TreeRequest) -> ServiceResult<ClusterTree>;

    /// Build a normalized per-vertex intensity map
    ///
    /// # Errors
    /// * `ServiceError::NoData` - No study-term row carries activations
    /// * `ServiceError::Timeout` - Construction exceeded the request bound;
    ///   the worker is cancelled
    ///
    async fn intensity(&self, source: IntensitySource) -> ServiceResult<IntensityMap>;

    /// Intensity map as plain text, one value per line
    async fn intensity_text(&self, source: IntensitySource) -> ServiceResult<String>;
}
