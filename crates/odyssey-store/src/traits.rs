// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Store traits.

The query layer only ever talks to these traits. Each call is an
independent read against the current state of the store; nothing is cached
between calls, so concurrent requests need no coordination of their own.
*/

use crate::error::StoreResult;
use odyssey_structures::{
    Activation, ClusterId, Coordinate, Cube, Location, LocationId, Pmid, Study, StudyTerm,
};
use std::collections::BTreeSet;

/// Read access to the study corpus
pub trait Store: Send + Sync {
    /// Distinct studies with an activation at a location strictly inside `cube`
    fn pmids_in_cube(&self, cube: &Cube) -> StoreResult<BTreeSet<Pmid>>;

    /// Distinct studies with an activation at exactly `coordinate`
    fn pmids_at(&self, coordinate: &Coordinate) -> StoreResult<BTreeSet<Pmid>>;

    /// Location at an exact coordinate, optionally restricted to a coordinate space
    fn location_at(
        &self,
        coordinate: &Coordinate,
        space: Option<&str>,
    ) -> StoreResult<Option<Location>>;

    /// Locations by id; unknown ids are skipped
    fn locations(&self, ids: &BTreeSet<LocationId>) -> StoreResult<Vec<Location>>;

    fn study(&self, pmid: Pmid) -> StoreResult<Option<Study>>;

    /// Bibliographic rows for `pmids`, ordered by pmid; unknown pmids are skipped
    fn studies(&self, pmids: &BTreeSet<Pmid>) -> StoreResult<Vec<Study>>;

    /// Studies whose `study_cluster` equals `cluster`
    fn pmids_in_study_cluster(&self, cluster: ClusterId) -> StoreResult<BTreeSet<Pmid>>;

    /// Every known pmid, ascending
    fn all_pmids(&self) -> StoreResult<Vec<Pmid>>;

    /// Study-term rows of the given studies ordered by frequency descending,
    /// ties in insertion order, truncated to `limit` when given
    fn study_terms_for_pmids(
        &self,
        pmids: &BTreeSet<Pmid>,
        limit: Option<usize>,
    ) -> StoreResult<Vec<StudyTerm>>;

    /// Study-term rows mentioning any of `words`, same ordering as above
    fn study_terms_for_words(
        &self,
        words: &BTreeSet<String>,
        limit: Option<usize>,
    ) -> StoreResult<Vec<StudyTerm>>;

    /// Activations reported by the given studies
    fn activations_for_pmids(&self, pmids: &BTreeSet<Pmid>) -> StoreResult<Vec<Activation>>;

    fn has_term(&self, word: &str) -> StoreResult<bool>;

    /// Clusters ranked by how many of `words` they contain: count descending,
    /// cluster id ascending, at most `n` entries, zero counts omitted
    fn cluster_counts_for_words(
        &self,
        words: &BTreeSet<String>,
        n: usize,
    ) -> StoreResult<Vec<(ClusterId, usize)>>;

    /// Term-cluster associations restricted to `clusters` x `words`
    fn term_cluster_pairs(
        &self,
        clusters: &BTreeSet<ClusterId>,
        words: &BTreeSet<String>,
    ) -> StoreResult<BTreeSet<(ClusterId, String)>>;

    /// Full membership of a topic cluster
    fn words_in_cluster(&self, cluster: ClusterId) -> StoreResult<BTreeSet<String>>;
}

/// Write seam used by the offline clustering pipeline
pub trait StudyClusterWriter: Send + Sync {
    /// Set (or clear) the topic cluster of a study. Returns `false` if the
    /// study is unknown.
    fn set_study_cluster(&self, pmid: Pmid, cluster: Option<ClusterId>) -> StoreResult<bool>;
}
