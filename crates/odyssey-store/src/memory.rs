// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
In-memory arena store.

Records live in flat arenas and are joined through explicit id indices:

```text
locations ── x-sorted index ──► cube range scans
          ── coordinate key ──► exact lookups
activations ── by location / by pmid
study_terms ── by pmid / by word   (row index == insertion order)
term_clusters ── by word / by cluster
```

Reads take a shared lock per call; the clustering writer takes the write
lock once per study, so a concurrent reader may observe a partially updated
assignment.
*/

use crate::error::{StoreError, StoreResult};
use crate::traits::{Store, StudyClusterWriter};
use ahash::{AHashMap, AHashSet};
use odyssey_structures::{
    Activation, ClusterId, Coordinate, CoordinateKey, Cube, Location, LocationId, Pmid, Study,
    StudyTerm,
};
use parking_lot::RwLock;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

/// Row counts, for logging and health checks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    pub locations: usize,
    pub studies: usize,
    pub activations: usize,
    pub terms: usize,
    pub study_terms: usize,
    pub clusters: usize,
    pub term_clusters: usize,
}

#[derive(Default)]
struct Tables {
    locations: Vec<Location>,
    location_slots: AHashMap<LocationId, usize>,
    locations_by_key: AHashMap<CoordinateKey, Vec<usize>>,
    /// Location slots ordered by x coordinate
    x_sorted: Vec<usize>,

    studies: BTreeMap<Pmid, Study>,

    activations: AHashSet<Activation>,
    pmids_by_location: AHashMap<LocationId, BTreeSet<Pmid>>,
    locations_by_pmid: AHashMap<Pmid, BTreeSet<LocationId>>,

    terms: BTreeSet<String>,

    /// Arena of study-term rows; `None` marks a deleted row
    study_terms: Vec<Option<StudyTerm>>,
    study_term_keys: AHashSet<(String, Pmid)>,
    study_terms_by_pmid: AHashMap<Pmid, Vec<usize>>,
    study_terms_by_word: AHashMap<String, Vec<usize>>,

    clusters: BTreeSet<ClusterId>,
    clusters_by_word: AHashMap<String, BTreeSet<ClusterId>>,
    words_by_cluster: BTreeMap<ClusterId, BTreeSet<String>>,
}

impl Tables {
    fn study_term_rows(&self, mut slots: Vec<usize>, limit: Option<usize>) -> Vec<StudyTerm> {
        // Slot order is insertion order; a stable sort keeps it for ties
        slots.sort_unstable();
        slots.dedup();
        let mut rows: Vec<&StudyTerm> = slots
            .into_iter()
            .filter_map(|slot| self.study_terms.get(slot).and_then(Option::as_ref))
            .collect();
        rows.sort_by(|a, b| {
            b.frequency
                .partial_cmp(&a.frequency)
                .unwrap_or(Ordering::Equal)
        });
        let take = limit.unwrap_or(rows.len());
        rows.into_iter().take(take).cloned().collect()
    }
}

/// Thread-safe in-memory implementation of [`Store`]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
    open: RwLock<bool>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::open()
    }
}

impl InMemoryStore {
    /// Open an empty store
    pub fn open() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
            open: RwLock::new(true),
        }
    }

    /// Close the store; subsequent calls fail with [`StoreError::Closed`]
    pub fn close(&self) {
        *self.open.write() = false;
        info!(target: "odyssey-store", "In-memory store closed");
    }

    pub fn is_open(&self) -> bool {
        *self.open.read()
    }

    fn ensure_open(&self) -> StoreResult<()> {
        if self.is_open() {
            Ok(())
        } else {
            Err(StoreError::Closed)
        }
    }

    pub fn stats(&self) -> StoreStats {
        let t = self.tables.read();
        StoreStats {
            locations: t.locations.len(),
            studies: t.studies.len(),
            activations: t.activations.len(),
            terms: t.terms.len(),
            study_terms: t.study_term_keys.len(),
            clusters: t.clusters.len(),
            term_clusters: t.words_by_cluster.values().map(BTreeSet::len).sum(),
        }
    }

    // ------------------------------------------------------------------
    // Writes
    // ------------------------------------------------------------------

    pub fn insert_location(&self, location: Location) -> StoreResult<()> {
        self.ensure_open()?;
        let mut t = self.tables.write();
        if t.location_slots.contains_key(&location.location_id) {
            return Err(StoreError::Integrity(format!(
                "location {} already exists",
                location.location_id
            )));
        }
        let slot = t.locations.len();
        let key = location.coordinate.key();
        let x = location.coordinate.x;

        let position = {
            let locations = &t.locations;
            t.x_sorted
                .partition_point(|&s| locations[s].coordinate.x <= x)
        };
        t.location_slots.insert(location.location_id, slot);
        t.locations_by_key.entry(key).or_default().push(slot);
        t.locations.push(location);
        t.x_sorted.insert(position, slot);
        Ok(())
    }

    /// Insert or replace a study's bibliographic row
    pub fn upsert_study(&self, study: Study) -> StoreResult<()> {
        self.ensure_open()?;
        self.tables.write().studies.insert(study.pmid, study);
        Ok(())
    }

    /// Record an activation. Duplicate (study, location) pairs are ignored.
    pub fn insert_activation(&self, activation: Activation) -> StoreResult<()> {
        self.ensure_open()?;
        let mut t = self.tables.write();
        if !t.studies.contains_key(&activation.pmid) {
            return Err(StoreError::Integrity(format!(
                "activation references unknown study {}",
                activation.pmid
            )));
        }
        if !t.location_slots.contains_key(&activation.location_id) {
            return Err(StoreError::Integrity(format!(
                "activation references unknown location {}",
                activation.location_id
            )));
        }
        if t.activations.insert(activation) {
            t.pmids_by_location
                .entry(activation.location_id)
                .or_default()
                .insert(activation.pmid);
            t.locations_by_pmid
                .entry(activation.pmid)
                .or_default()
                .insert(activation.location_id);
        }
        Ok(())
    }

    pub fn insert_term(&self, word: impl Into<String>) -> StoreResult<()> {
        self.ensure_open()?;
        self.tables.write().terms.insert(word.into());
        Ok(())
    }

    /// Insert a study-term row, creating the term if needed.
    /// A (word, study) pair may only be recorded once.
    pub fn insert_study_term(&self, row: StudyTerm) -> StoreResult<()> {
        self.ensure_open()?;
        let mut t = self.tables.write();
        if !t.studies.contains_key(&row.pmid) {
            return Err(StoreError::Integrity(format!(
                "study term '{}' references unknown study {}",
                row.word, row.pmid
            )));
        }
        let key = (row.word.clone(), row.pmid);
        if t.study_term_keys.contains(&key) {
            return Err(StoreError::Integrity(format!(
                "study term ('{}', {}) already exists",
                row.word, row.pmid
            )));
        }
        let slot = t.study_terms.len();
        t.terms.insert(row.word.clone());
        t.study_term_keys.insert(key);
        t.study_terms_by_pmid.entry(row.pmid).or_default().push(slot);
        t.study_terms_by_word
            .entry(row.word.clone())
            .or_default()
            .push(slot);
        t.study_terms.push(Some(row));
        Ok(())
    }

    pub fn insert_cluster(&self, cluster: ClusterId) -> StoreResult<()> {
        self.ensure_open()?;
        self.tables.write().clusters.insert(cluster);
        Ok(())
    }

    /// Associate a known term with a cluster, creating the cluster if needed
    pub fn insert_term_cluster(&self, word: &str, cluster: ClusterId) -> StoreResult<()> {
        self.ensure_open()?;
        let mut t = self.tables.write();
        if !t.terms.contains(word) {
            return Err(StoreError::Integrity(format!(
                "term cluster references unknown term '{}'",
                word
            )));
        }
        t.clusters.insert(cluster);
        t.clusters_by_word
            .entry(word.to_string())
            .or_default()
            .insert(cluster);
        t.words_by_cluster
            .entry(cluster)
            .or_default()
            .insert(word.to_string());
        Ok(())
    }

    /// Delete a study together with its activations and study-term rows.
    /// Shared locations and terms are left in place.
    pub fn delete_study(&self, pmid: Pmid) -> StoreResult<bool> {
        self.ensure_open()?;
        let mut t = self.tables.write();
        if t.studies.remove(&pmid).is_none() {
            return Ok(false);
        }

        if let Some(location_ids) = t.locations_by_pmid.remove(&pmid) {
            for location_id in location_ids {
                t.activations.remove(&Activation { pmid, location_id });
                if let Some(pmids) = t.pmids_by_location.get_mut(&location_id) {
                    pmids.remove(&pmid);
                    if pmids.is_empty() {
                        t.pmids_by_location.remove(&location_id);
                    }
                }
            }
        }

        if let Some(slots) = t.study_terms_by_pmid.remove(&pmid) {
            for slot in slots {
                if let Some(row) = t.study_terms.get_mut(slot).and_then(Option::take) {
                    t.study_term_keys.remove(&(row.word.clone(), pmid));
                    if let Some(word_slots) = t.study_terms_by_word.get_mut(&row.word) {
                        word_slots.retain(|s| *s != slot);
                    }
                }
            }
        }

        debug!(target: "odyssey-store", "Deleted study {} and its dependent rows", pmid);
        Ok(true)
    }
}

impl Store for InMemoryStore {
    fn pmids_in_cube(&self, cube: &Cube) -> StoreResult<BTreeSet<Pmid>> {
        self.ensure_open()?;
        let t = self.tables.read();
        let (low, high) = cube.x_bounds();

        let start = t
            .x_sorted
            .partition_point(|&s| t.locations[s].coordinate.x <= low);
        let mut pmids = BTreeSet::new();
        for &slot in &t.x_sorted[start..] {
            let location = &t.locations[slot];
            if location.coordinate.x >= high {
                break;
            }
            if !cube.contains(&location.coordinate) {
                continue;
            }
            if let Some(found) = t.pmids_by_location.get(&location.location_id) {
                pmids.extend(found.iter().copied());
            }
        }
        Ok(pmids)
    }

    fn pmids_at(&self, coordinate: &Coordinate) -> StoreResult<BTreeSet<Pmid>> {
        self.ensure_open()?;
        let t = self.tables.read();
        let mut pmids = BTreeSet::new();
        if let Some(slots) = t.locations_by_key.get(&coordinate.key()) {
            for &slot in slots {
                if let Some(found) = t.pmids_by_location.get(&t.locations[slot].location_id) {
                    pmids.extend(found.iter().copied());
                }
            }
        }
        Ok(pmids)
    }

    fn location_at(
        &self,
        coordinate: &Coordinate,
        space: Option<&str>,
    ) -> StoreResult<Option<Location>> {
        self.ensure_open()?;
        let t = self.tables.read();
        let found = t.locations_by_key.get(&coordinate.key()).and_then(|slots| {
            slots
                .iter()
                .map(|&slot| &t.locations[slot])
                .find(|l| space.map_or(true, |s| l.space.as_deref() == Some(s)))
                .cloned()
        });
        Ok(found)
    }

    fn locations(&self, ids: &BTreeSet<LocationId>) -> StoreResult<Vec<Location>> {
        self.ensure_open()?;
        let t = self.tables.read();
        Ok(ids
            .iter()
            .filter_map(|id| t.location_slots.get(id))
            .map(|&slot| t.locations[slot].clone())
            .collect())
    }

    fn study(&self, pmid: Pmid) -> StoreResult<Option<Study>> {
        self.ensure_open()?;
        Ok(self.tables.read().studies.get(&pmid).cloned())
    }

    fn studies(&self, pmids: &BTreeSet<Pmid>) -> StoreResult<Vec<Study>> {
        self.ensure_open()?;
        let t = self.tables.read();
        Ok(pmids
            .iter()
            .filter_map(|pmid| t.studies.get(pmid).cloned())
            .collect())
    }

    fn pmids_in_study_cluster(&self, cluster: ClusterId) -> StoreResult<BTreeSet<Pmid>> {
        self.ensure_open()?;
        let t = self.tables.read();
        Ok(t.studies
            .values()
            .filter(|s| s.study_cluster == Some(cluster))
            .map(|s| s.pmid)
            .collect())
    }

    fn all_pmids(&self) -> StoreResult<Vec<Pmid>> {
        self.ensure_open()?;
        Ok(self.tables.read().studies.keys().copied().collect())
    }

    fn study_terms_for_pmids(
        &self,
        pmids: &BTreeSet<Pmid>,
        limit: Option<usize>,
    ) -> StoreResult<Vec<StudyTerm>> {
        self.ensure_open()?;
        let t = self.tables.read();
        let slots: Vec<usize> = pmids
            .iter()
            .filter_map(|pmid| t.study_terms_by_pmid.get(pmid))
            .flatten()
            .copied()
            .collect();
        Ok(t.study_term_rows(slots, limit))
    }

    fn study_terms_for_words(
        &self,
        words: &BTreeSet<String>,
        limit: Option<usize>,
    ) -> StoreResult<Vec<StudyTerm>> {
        self.ensure_open()?;
        let t = self.tables.read();
        let slots: Vec<usize> = words
            .iter()
            .filter_map(|word| t.study_terms_by_word.get(word))
            .flatten()
            .copied()
            .collect();
        Ok(t.study_term_rows(slots, limit))
    }

    fn activations_for_pmids(&self, pmids: &BTreeSet<Pmid>) -> StoreResult<Vec<Activation>> {
        self.ensure_open()?;
        let t = self.tables.read();
        let mut activations = Vec::new();
        for &pmid in pmids {
            if let Some(location_ids) = t.locations_by_pmid.get(&pmid) {
                activations.extend(
                    location_ids
                        .iter()
                        .map(|&location_id| Activation { pmid, location_id }),
                );
            }
        }
        Ok(activations)
    }

    fn has_term(&self, word: &str) -> StoreResult<bool> {
        self.ensure_open()?;
        Ok(self.tables.read().terms.contains(word))
    }

    fn cluster_counts_for_words(
        &self,
        words: &BTreeSet<String>,
        n: usize,
    ) -> StoreResult<Vec<(ClusterId, usize)>> {
        self.ensure_open()?;
        let t = self.tables.read();
        let mut counts: BTreeMap<ClusterId, usize> = BTreeMap::new();
        for word in words {
            if let Some(clusters) = t.clusters_by_word.get(word) {
                for &cluster in clusters {
                    *counts.entry(cluster).or_insert(0) += 1;
                }
            }
        }
        let mut ranked: Vec<(ClusterId, usize)> = counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        ranked.truncate(n);
        Ok(ranked)
    }

    fn term_cluster_pairs(
        &self,
        clusters: &BTreeSet<ClusterId>,
        words: &BTreeSet<String>,
    ) -> StoreResult<BTreeSet<(ClusterId, String)>> {
        self.ensure_open()?;
        let t = self.tables.read();
        let mut pairs = BTreeSet::new();
        for word in words {
            if let Some(word_clusters) = t.clusters_by_word.get(word) {
                for cluster in word_clusters.intersection(clusters) {
                    pairs.insert((*cluster, word.clone()));
                }
            }
        }
        Ok(pairs)
    }

    fn words_in_cluster(&self, cluster: ClusterId) -> StoreResult<BTreeSet<String>> {
        self.ensure_open()?;
        Ok(self
            .tables
            .read()
            .words_by_cluster
            .get(&cluster)
            .cloned()
            .unwrap_or_default())
    }
}

impl StudyClusterWriter for InMemoryStore {
    fn set_study_cluster(&self, pmid: Pmid, cluster: Option<ClusterId>) -> StoreResult<bool> {
        self.ensure_open()?;
        let mut t = self.tables.write();
        match t.studies.get_mut(&pmid) {
            Some(study) => {
                study.study_cluster = cluster;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
