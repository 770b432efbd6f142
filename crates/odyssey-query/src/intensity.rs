// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Dense per-vertex intensity maps over the brain-surface mesh.

Scores are resolved per location, normalized by the largest score in the
result, then written into a vector with one entry per mesh vertex. Location
ids at or above the vertex count are not part of the mesh and are dropped
when the vector is materialized.
*/

use crate::error::{QueryError, QueryResult};
use crate::spatial::SpatialResolver;
use odyssey_store::Store;
use odyssey_structures::{ClusterId, IntensityMap, LocationId, Pmid, MESH_VERTEX_COUNT};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntensitySettings {
    pub vertex_count: usize,
    /// Study-term rows at or below this frequency are ignored
    pub min_frequency: f64,
    /// Vertices written between two cancellation checks
    pub cancel_check_interval: usize,
}

impl Default for IntensitySettings {
    fn default() -> Self {
        Self {
            vertex_count: MESH_VERTEX_COUNT,
            min_frequency: 0.05,
            cancel_check_interval: 4096,
        }
    }
}

/// What an intensity map is built from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum IntensitySource {
    Word { word: String },
    Words { words: Vec<String> },
    /// All words of a topic cluster
    Topic { cluster_id: ClusterId },
    /// Studies sharing the topic cluster of a study
    ClusterMates { pmid: Pmid },
    /// All zeros
    Clear,
}

/// Cooperative cancellation shared between a request and its worker
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

pub struct IntensityMapper {
    store: Arc<dyn Store>,
    resolver: Arc<SpatialResolver>,
    settings: IntensitySettings,
}

impl IntensityMapper {
    pub fn new(
        store: Arc<dyn Store>,
        resolver: Arc<SpatialResolver>,
        settings: IntensitySettings,
    ) -> Self {
        Self {
            store,
            resolver,
            settings,
        }
    }

    pub fn settings(&self) -> &IntensitySettings {
        &self.settings
    }

    pub fn build_intensity_map(
        &self,
        source: &IntensitySource,
        cancel: &CancelFlag,
    ) -> QueryResult<IntensityMap> {
        let scores = match source {
            IntensitySource::Clear => return Ok(IntensityMap::zeros(self.settings.vertex_count)),
            IntensitySource::Word { word } => {
                self.word_scores(&BTreeSet::from([word.clone()]))?
            }
            IntensitySource::Words { words } => {
                self.word_scores(&words.iter().cloned().collect())?
            }
            IntensitySource::Topic { cluster_id } => {
                let words = self.store.words_in_cluster(*cluster_id)?;
                self.word_scores(&words)?
            }
            IntensitySource::ClusterMates { pmid } => self.cluster_mate_scores(*pmid)?,
        };

        if cancel.is_cancelled() {
            return Err(QueryError::Cancelled);
        }
        let map = self.materialize(&scores, cancel)?;
        debug!(
            target: "odyssey-query",
            "Intensity map with {} scored locations, {} active vertices",
            scores.len(),
            map.active_vertices()
        );
        Ok(map)
    }

    /// Summed frequencies per location for studies mentioning `words`
    fn word_scores(&self, words: &BTreeSet<String>) -> QueryResult<BTreeMap<LocationId, f64>> {
        if words.is_empty() {
            return Ok(BTreeMap::new());
        }

        let mut per_study: BTreeMap<Pmid, f64> = BTreeMap::new();
        for row in self.store.study_terms_for_words(words, None)? {
            if row.frequency > self.settings.min_frequency {
                *per_study.entry(row.pmid).or_insert(0.0) += row.frequency;
            }
        }

        let pmids: BTreeSet<Pmid> = per_study.keys().copied().collect();
        let mut scores: BTreeMap<LocationId, f64> = BTreeMap::new();
        for activation in self.store.activations_for_pmids(&pmids)? {
            if let Some(study_score) = per_study.get(&activation.pmid) {
                *scores.entry(activation.location_id).or_insert(0.0) += study_score;
            }
        }
        Ok(scores)
    }

    /// Number of cluster-mate studies reporting each location
    fn cluster_mate_scores(&self, pmid: Pmid) -> QueryResult<BTreeMap<LocationId, f64>> {
        let mates = self.resolver.resolve_by_cluster_mates(pmid)?;
        let mut counts: BTreeMap<LocationId, BTreeSet<Pmid>> = BTreeMap::new();
        for activation in self.store.activations_for_pmids(&mates)? {
            counts
                .entry(activation.location_id)
                .or_default()
                .insert(activation.pmid);
        }
        Ok(counts
            .into_iter()
            .map(|(location, studies)| (location, studies.len() as f64))
            .collect())
    }

    fn materialize(
        &self,
        scores: &BTreeMap<LocationId, f64>,
        cancel: &CancelFlag,
    ) -> QueryResult<IntensityMap> {
        let max = scores.values().copied().fold(0.0, f64::max);
        if max <= 0.0 {
            return Err(QueryError::NoActivationData);
        }

        let interval = self.settings.cancel_check_interval.max(1);
        let mut values = Vec::with_capacity(self.settings.vertex_count);
        for vertex in 0..self.settings.vertex_count {
            if vertex % interval == 0 && cancel.is_cancelled() {
                return Err(QueryError::Cancelled);
            }
            let value = u32::try_from(vertex)
                .ok()
                .and_then(|id| scores.get(&LocationId::from(id)))
                .map_or(0.0, |score| score / max);
            values.push(value);
        }
        Ok(IntensityMap::from_values(values))
    }
}
