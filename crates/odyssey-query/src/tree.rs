// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Three-level weighted hierarchy for the visualization front end.

```text
root (label describes the request)
 ├── cluster 133
 │    ├── disease   weight = frequency * scale
 │    └── ...
 └── cluster 56
      └── ...
```
*/

use crate::error::{QueryError, QueryResult};
use crate::terms::TermAggregator;
use crate::topics::TopicSelector;
use odyssey_structures::{ClusterId, ClusterNode, ClusterTree, Coordinate, Pmid, TermLeaf};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreeSettings {
    /// Number of clusters under the root
    pub top_n: usize,
    /// Multiplier turning frequencies into leaf weights
    pub scale: f64,
}

impl Default for TreeSettings {
    fn default() -> Self {
        Self {
            top_n: 12,
            scale: 70000.0,
        }
    }
}

/// What a tree is built for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum TreeRequest {
    /// Studies near a coordinate; no radius means an exact match
    Location {
        x: f64,
        y: f64,
        z: f64,
        #[serde(default)]
        radius: Option<f64>,
    },
    /// Cluster mates of a study
    Study { pmid: Pmid },
    /// Studies mentioning a word
    Word { word: String },
    /// Studies mentioning any word of a topic cluster
    Topic { cluster_id: ClusterId },
}

impl TreeRequest {
    /// Root label naming the source of the tree
    pub fn root_label(&self) -> String {
        match self {
            TreeRequest::Location { x, y, z, .. } => Coordinate::from((*x, *y, *z)).to_string(),
            TreeRequest::Study { pmid } => format!("study {}", pmid),
            TreeRequest::Word { word } => word.clone(),
            TreeRequest::Topic { cluster_id } => format!("topic {}", cluster_id),
        }
    }
}

pub struct TreeAssembler {
    terms: TermAggregator,
    topics: TopicSelector,
    settings: TreeSettings,
}

impl TreeAssembler {
    pub fn new(terms: TermAggregator, topics: TopicSelector, settings: TreeSettings) -> Self {
        Self {
            terms,
            topics,
            settings,
        }
    }

    pub fn settings(&self) -> &TreeSettings {
        &self.settings
    }

    /// Build the root -> cluster -> term tree for `pmids`.
    ///
    /// Clusters keep the order of [`TopicSelector::top_clusters`] and their
    /// children keep term rank order. An empty study set yields a root with
    /// no children.
    pub fn build_tree(
        &self,
        label: impl Into<String>,
        pmids: &BTreeSet<Pmid>,
        scale: f64,
    ) -> QueryResult<ClusterTree> {
        let label = label.into();
        let aggregate = self.terms.aggregate(pmids)?;
        if aggregate.is_empty() {
            return Ok(ClusterTree::empty(label));
        }

        let words = aggregate.filtered_word_set();
        let clusters = self.topics.top_clusters(&words, self.settings.top_n)?;
        let cluster_set: BTreeSet<ClusterId> = clusters.iter().copied().collect();
        let pairs = self.topics.word_cluster_pairs(&cluster_set, &words)?;

        // Duplicate words accumulate into a single leaf
        let mut leaves: Vec<TermLeaf> = Vec::new();
        let mut leaf_slots: HashMap<&str, usize> = HashMap::new();
        for (word, frequency) in &aggregate.ranked_terms {
            match leaf_slots.get(word.as_str()) {
                Some(&slot) => leaves[slot].weight += frequency * scale,
                None => {
                    leaf_slots.insert(word.as_str(), leaves.len());
                    leaves.push(TermLeaf {
                        label: word.clone(),
                        weight: frequency * scale,
                    });
                }
            }
        }

        let mut children = Vec::with_capacity(clusters.len());
        for cluster in clusters {
            let members: Vec<TermLeaf> = leaves
                .iter()
                .filter(|leaf| pairs.contains(&(cluster, leaf.label.clone())))
                .cloned()
                .collect();
            if members.is_empty() {
                warn!(
                    target: "odyssey-query",
                    "Cluster {} selected without matching terms",
                    cluster
                );
                return Err(QueryError::InconsistentClusterData { cluster });
            }
            children.push(ClusterNode::new(cluster, members));
        }

        debug!(
            target: "odyssey-query",
            "Built tree '{}' with {} clusters from {} studies",
            label,
            children.len(),
            pmids.len()
        );

        Ok(ClusterTree { label, children })
    }
}
