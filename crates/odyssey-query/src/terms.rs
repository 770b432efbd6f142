// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Ranked term frequencies for a set of studies.

use crate::error::QueryResult;
use odyssey_store::Store;
use odyssey_structures::Pmid;
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TermSettings {
    pub limit: usize,
    pub freq_threshold: f64,
}

impl Default for TermSettings {
    fn default() -> Self {
        Self {
            limit: 100,
            freq_threshold: 0.05,
        }
    }
}

/// Output of [`TermAggregator::aggregate_terms`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TermAggregate {
    /// `(word, frequency)` rows, frequency non-increasing
    pub ranked_terms: Vec<(String, f64)>,
    /// Distinct words of `ranked_terms` above the threshold, in rank order
    pub filtered_words: Vec<String>,
}

impl TermAggregate {
    pub fn is_empty(&self) -> bool {
        self.ranked_terms.is_empty()
    }

    pub fn filtered_word_set(&self) -> BTreeSet<String> {
        self.filtered_words.iter().cloned().collect()
    }
}

pub struct TermAggregator {
    store: Arc<dyn Store>,
    settings: TermSettings,
}

impl TermAggregator {
    pub fn new(store: Arc<dyn Store>, settings: TermSettings) -> Self {
        Self { store, settings }
    }

    pub fn settings(&self) -> &TermSettings {
        &self.settings
    }

    /// Aggregate with the configured limit and threshold
    pub fn aggregate(&self, pmids: &BTreeSet<Pmid>) -> QueryResult<TermAggregate> {
        self.aggregate_terms(pmids, self.settings.limit, self.settings.freq_threshold)
    }

    /// Study-term rows of `pmids` ranked by frequency (ties keep store
    /// insertion order) and truncated to `limit`, plus the words whose
    /// frequency exceeds `freq_threshold`.
    pub fn aggregate_terms(
        &self,
        pmids: &BTreeSet<Pmid>,
        limit: usize,
        freq_threshold: f64,
    ) -> QueryResult<TermAggregate> {
        if pmids.is_empty() || limit == 0 {
            return Ok(TermAggregate::default());
        }

        let rows = self.store.study_terms_for_pmids(pmids, Some(limit))?;
        let ranked_terms: Vec<(String, f64)> =
            rows.into_iter().map(|row| (row.word, row.frequency)).collect();

        let mut seen: HashSet<String> = HashSet::new();
        let mut filtered_words = Vec::new();
        for (word, frequency) in &ranked_terms {
            if *frequency > freq_threshold && seen.insert(word.clone()) {
                filtered_words.push(word.clone());
            }
        }

        debug!(
            target: "odyssey-query",
            "Aggregated {} term rows for {} studies, {} above {}",
            ranked_terms.len(),
            pmids.len(),
            filtered_words.len(),
            freq_threshold
        );

        Ok(TermAggregate {
            ranked_terms,
            filtered_words,
        })
    }
}
