// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Topic-cluster selection for a set of query terms.

use crate::error::QueryResult;
use odyssey_store::Store;
use odyssey_structures::ClusterId;
use std::collections::BTreeSet;
use std::sync::Arc;

pub struct TopicSelector {
    store: Arc<dyn Store>,
}

impl TopicSelector {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// The `n` clusters holding the most of `words`, ties broken by lower
    /// cluster id. Clusters holding none of the words are never returned.
    pub fn top_clusters(&self, words: &BTreeSet<String>, n: usize) -> QueryResult<Vec<ClusterId>> {
        if words.is_empty() || n == 0 {
            return Ok(Vec::new());
        }
        let ranked = self.store.cluster_counts_for_words(words, n)?;
        Ok(ranked
            .into_iter()
            .filter(|(_, count)| *count > 0)
            .map(|(cluster, _)| cluster)
            .collect())
    }

    /// Term-cluster associations restricted to `clusters` and `words`
    pub fn word_cluster_pairs(
        &self,
        clusters: &BTreeSet<ClusterId>,
        words: &BTreeSet<String>,
    ) -> QueryResult<BTreeSet<(ClusterId, String)>> {
        if clusters.is_empty() || words.is_empty() {
            return Ok(BTreeSet::new());
        }
        Ok(self.store.term_cluster_pairs(clusters, words)?)
    }

    pub fn words_in_cluster(&self, cluster: ClusterId) -> QueryResult<BTreeSet<String>> {
        Ok(self.store.words_in_cluster(cluster)?)
    }
}
