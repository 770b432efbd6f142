// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Spatial resolution: from a coordinate, a study, a word or a topic to the set
of studies it selects.

Radius searches widen by a fixed step until something is found or the
configured maximum radius is passed.
*/

use crate::error::{QueryError, QueryResult};
use odyssey_store::Store;
use odyssey_structures::{ClusterId, Coordinate, Cube, LocationId, Pmid};
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;
use tracing::{debug, warn};

/// Upper bound on cube scans of a single widening search
pub const MAX_WIDENING_STEPS: usize = 1000;

/// Bounds of the adaptive radius search
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpatialSettings {
    pub radius_step: f64,
    pub max_radius: f64,
}

impl Default for SpatialSettings {
    fn default() -> Self {
        Self {
            radius_step: 1.0,
            max_radius: 20.0,
        }
    }
}

pub struct SpatialResolver {
    store: Arc<dyn Store>,
    settings: SpatialSettings,
}

impl SpatialResolver {
    pub fn new(store: Arc<dyn Store>, settings: SpatialSettings) -> Self {
        Self { store, settings }
    }

    pub fn settings(&self) -> &SpatialSettings {
        &self.settings
    }

    /// Studies with an activation at or near `center`.
    ///
    /// Without a radius this is an exact coordinate match and may be empty.
    /// With a radius, the cube grows by `radius_step` until it contains a
    /// study; past `max_radius` the search fails with [`QueryError::EmptyRegion`].
    /// Settings that would take more than [`MAX_WIDENING_STEPS`] scans are
    /// rejected up front.
    pub fn resolve_by_coordinate(
        &self,
        center: Coordinate,
        radius: Option<f64>,
    ) -> QueryResult<BTreeSet<Pmid>> {
        let Some(mut radius) = radius else {
            let pmids = self.store.pmids_at(&center)?;
            debug!(target: "odyssey-query", "Exact match at ({}): {} studies", center, pmids.len());
            return Ok(pmids);
        };

        let step = self.settings.radius_step;
        if step.is_nan() || step <= 0.0 {
            return Err(QueryError::InvalidParameters(format!(
                "radius step must be positive, got {}",
                step
            )));
        }
        let max_radius = self.settings.max_radius;
        if !max_radius.is_finite() {
            return Err(QueryError::InvalidParameters(format!(
                "max radius must be finite, got {}",
                max_radius
            )));
        }
        let steps = ((max_radius - radius) / step).ceil().max(0.0);
        if steps > MAX_WIDENING_STEPS as f64 {
            return Err(QueryError::InvalidParameters(format!(
                "widening from {} to {} by {} takes {} steps, limit is {}",
                radius, max_radius, step, steps, MAX_WIDENING_STEPS
            )));
        }

        for _ in 0..=MAX_WIDENING_STEPS {
            let cube = Cube::new(center, radius)?;
            let pmids = self.store.pmids_in_cube(&cube)?;
            if !pmids.is_empty() {
                debug!(
                    target: "odyssey-query",
                    "Found {} studies within {} of ({})",
                    pmids.len(),
                    radius,
                    center
                );
                return Ok(pmids);
            }

            radius += step;
            if radius > max_radius {
                break;
            }
        }

        warn!(
            target: "odyssey-query",
            "Radius search around ({}) exhausted at {}",
            center,
            max_radius
        );
        Err(QueryError::EmptyRegion { center, max_radius })
    }

    /// Every study sharing the topic cluster of `pmid`, itself included
    pub fn resolve_by_cluster_mates(&self, pmid: Pmid) -> QueryResult<BTreeSet<Pmid>> {
        let study = self
            .store
            .study(pmid)?
            .ok_or(QueryError::StudyNotFound(pmid))?;
        let cluster = study
            .study_cluster
            .ok_or(QueryError::StudyNotFound(pmid))?;
        let mates = self.store.pmids_in_study_cluster(cluster)?;
        debug!(
            target: "odyssey-query",
            "Study {} has {} cluster mates in {}",
            pmid,
            mates.len(),
            cluster
        );
        Ok(mates)
    }

    /// Studies that mention any of `words`
    pub fn resolve_by_words(&self, words: &BTreeSet<String>) -> QueryResult<BTreeSet<Pmid>> {
        if words.is_empty() {
            return Ok(BTreeSet::new());
        }
        let rows = self.store.study_terms_for_words(words, None)?;
        Ok(rows.into_iter().map(|row| row.pmid).collect())
    }

    pub fn resolve_by_topic(&self, cluster: ClusterId) -> QueryResult<BTreeSet<Pmid>> {
        let words = self.store.words_in_cluster(cluster)?;
        self.resolve_by_words(&words)
    }

    /// Distinct activation coordinates of the studies mentioning `word`,
    /// ordered by location id
    pub fn locations_for_word(&self, word: &str) -> QueryResult<Vec<Coordinate>> {
        let words = BTreeSet::from([word.to_string()]);
        let pmids = self.resolve_by_words(&words)?;
        let location_ids: BTreeSet<LocationId> = self
            .store
            .activations_for_pmids(&pmids)?
            .into_iter()
            .map(|a| a.location_id)
            .collect();

        let mut seen = HashSet::new();
        let mut coordinates = Vec::new();
        for location in self.store.locations(&location_ids)? {
            if seen.insert(location.coordinate.key()) {
                coordinates.push(location.coordinate);
            }
        }
        Ok(coordinates)
    }
}
