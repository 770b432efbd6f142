// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Topic service implementation.
*/

use super::run_blocking;
use crate::traits::TopicService;
use crate::types::*;
use async_trait::async_trait;
use odyssey_query::QueryEngine;
use odyssey_structures::{ClusterId, Pmid};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

/// Default implementation of TopicService
pub struct TopicServiceImpl {
    engine: Arc<QueryEngine>,
    top_n: usize,
}

impl TopicServiceImpl {
    pub fn new(engine: Arc<QueryEngine>, top_n: usize) -> Self {
        Self { engine, top_n }
    }
}

#[async_trait]
impl TopicService for TopicServiceImpl {
    async fn aggregate_terms(
        &self,
        pmids: Vec<Pmid>,
        limit: Option<usize>,
    ) -> ServiceResult<TermRanking> {
        debug!(target: "odyssey-services", "Aggregating terms of {} studies", pmids.len());

        let engine = self.engine.clone();
        run_blocking(move || {
            let terms = engine.terms();
            let settings = *terms.settings();
            let pmids: BTreeSet<Pmid> = pmids.into_iter().collect();
            let aggregate = terms.aggregate_terms(
                &pmids,
                limit.unwrap_or(settings.limit),
                settings.freq_threshold,
            )?;
            Ok(TermRanking::from(aggregate))
        })
        .await
    }

    async fn top_clusters(&self, words: Vec<String>) -> ServiceResult<Vec<ClusterId>> {
        debug!(
            target: "odyssey-services",
            "Selecting top {} clusters for {} words",
            self.top_n,
            words.len()
        );

        let engine = self.engine.clone();
        let n = self.top_n;
        run_blocking(move || {
            let words: BTreeSet<String> = words.into_iter().collect();
            Ok(engine.topics().top_clusters(&words, n)?)
        })
        .await
    }

    async fn word_cluster_pairs(
        &self,
        clusters: Vec<ClusterId>,
        words: Vec<String>,
    ) -> ServiceResult<Vec<WordClusterPair>> {
        let engine = self.engine.clone();
        run_blocking(move || {
            let clusters: BTreeSet<ClusterId> = clusters.into_iter().collect();
            let words: BTreeSet<String> = words.into_iter().collect();
            let pairs = engine.topics().word_cluster_pairs(&clusters, &words)?;
            Ok(pairs
                .into_iter()
                .map(|(cluster_id, word)| WordClusterPair { cluster_id, word })
                .collect())
        })
        .await
    }

    async fn words_in_cluster(&self, cluster_id: ClusterId) -> ServiceResult<Vec<String>> {
        let engine = self.engine.clone();
        run_blocking(move || {
            Ok(engine
                .topics()
                .words_in_cluster(cluster_id)?
                .into_iter()
                .collect())
        })
            .await
    }
}
