// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Transport-agnostic Data Transfer Objects (DTOs).

These types define the stable contract between adapters and services and
serialize to JSON or any other serde format.
*/

use chrono::{DateTime, Utc};
use odyssey_clustering::{ApplySummary, ElbowReport};
use odyssey_query::TermAggregate;
use odyssey_structures::{ClusterId, Coordinate};
use serde::{Deserialize, Serialize};

// ============================================================================
// TERM DTOs
// ============================================================================

/// A word and its aggregated frequency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedTerm {
    pub word: String,
    pub frequency: f64,
}

/// Ranked terms of a study set and the words above the threshold
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TermRanking {
    pub ranked_terms: Vec<RankedTerm>,
    pub filtered_words: Vec<String>,
}

impl From<TermAggregate> for TermRanking {
    fn from(aggregate: TermAggregate) -> Self {
        Self {
            ranked_terms: aggregate
                .ranked_terms
                .into_iter()
                .map(|(word, frequency)| RankedTerm { word, frequency })
                .collect(),
            filtered_words: aggregate.filtered_words,
        }
    }
}

// ============================================================================
// TOPIC DTOs
// ============================================================================

/// One term-cluster association
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordClusterPair {
    pub cluster_id: ClusterId,
    pub word: String,
}

// ============================================================================
// LOCATION DTOs
// ============================================================================

/// Activation coordinates of the studies mentioning a word
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordLocations {
    pub word: String,
    pub coordinates: Vec<(f64, f64, f64)>,
}

impl WordLocations {
    pub fn new(word: impl Into<String>, coordinates: &[Coordinate]) -> Self {
        Self {
            word: word.into(),
            coordinates: coordinates.iter().map(|c| (c.x, c.y, c.z)).collect(),
        }
    }
}

// ============================================================================
// CLUSTERING DTOs
// ============================================================================

/// Cumulative explained variance at one dimensionality
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarianceProfileEntry {
    pub dims: usize,
    pub explained_variance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElbowRow {
    pub k: usize,
    pub wcss: f64,
    pub bss: f64,
    pub bss_ratio: f64,
    pub marginal_gain: Option<f64>,
}

/// Advisory elbow report; the caller picks k
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElbowSummary {
    pub tss: f64,
    pub rows: Vec<ElbowRow>,
}

impl From<&ElbowReport> for ElbowSummary {
    fn from(report: &ElbowReport) -> Self {
        Self {
            tss: report.tss,
            rows: report
                .entries
                .iter()
                .map(|e| ElbowRow {
                    k: e.k,
                    wcss: e.wcss,
                    bss: e.bss,
                    bss_ratio: e.bss_ratio,
                    marginal_gain: e.marginal_gain,
                })
                .collect(),
        }
    }
}

/// Outcome of an assignment run written to the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusteringRunSummary {
    pub k: usize,
    pub studies: usize,
    pub updated: usize,
    /// Assignments naming a study the store does not hold
    pub skipped: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl ClusteringRunSummary {
    pub fn new(
        k: usize,
        studies: usize,
        applied: ApplySummary,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            k,
            studies,
            updated: applied.updated,
            skipped: applied.skipped,
            started_at,
            finished_at: Utc::now(),
        }
    }

    pub fn duration_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_term_ranking_from_aggregate() {
        let aggregate = TermAggregate {
            ranked_terms: vec![("stress".to_string(), 0.3), ("reward".to_string(), 0.01)],
            filtered_words: vec!["stress".to_string()],
        };
        let ranking = TermRanking::from(aggregate);
        assert_eq!(ranking.ranked_terms[0].word, "stress");
        assert_eq!(ranking.ranked_terms[1].frequency, 0.01);
        assert_eq!(ranking.filtered_words, vec!["stress".to_string()]);

        let json = serde_json::to_value(&ranking).unwrap();
        assert_eq!(json["ranked_terms"][0]["word"], "stress");
    }

    #[test]
    fn test_word_locations_flatten_coordinates() {
        let coords = [Coordinate::new(40.0, -45.0, -25.0).unwrap()];
        let locations = WordLocations::new("pain", &coords);
        assert_eq!(locations.coordinates, vec![(40.0, -45.0, -25.0)]);
    }
}
