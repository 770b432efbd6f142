// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Term and topic service trait.
*/

use crate::types::*;
use async_trait::async_trait;
use odyssey_structures::{ClusterId, Pmid};

/// Term aggregation and topic selection (transport-agnostic)
#[async_trait]
pub trait TopicService: Send + Sync {
    /// Rank the terms of a study set
    ///
    /// # Arguments
    /// * `pmids` - Studies to aggregate over
    /// * `limit` - Maximum rows; `None` uses the configured limit
    ///
    /// # Returns
    /// * `TermRanking` - Rows by descending frequency, plus the distinct
    ///   words above the frequency threshold
    ///
    async fn aggregate_terms(
        &self,
        pmids: Vec<Pmid>,
        limit: Option<usize>,
    ) -> ServiceResult<TermRanking>;

    /// Clusters holding the most of `words`, at most the configured count
    async fn top_clusters(&self, words: Vec<String>) -> ServiceResult<Vec<ClusterId>>;

    /// Term-cluster associations restricted to `clusters` and `words`
    async fn word_cluster_pairs(
        &self,
        clusters: Vec<ClusterId>,
        words: Vec<String>,
    ) -> ServiceResult<Vec<WordClusterPair>>;

    /// All words of a topic cluster in ascending order
    async fn words_in_cluster(&self, cluster_id: ClusterId) -> ServiceResult<Vec<String>>;
}
