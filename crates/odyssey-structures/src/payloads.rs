// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Payload shapes crossing the boundary to the presentation layer.

- [`ClusterTree`]: strict three-level weighted hierarchy (root -> cluster -> term)
- [`IntensityMap`]: dense per-vertex values in mesh index order
- [`Citation`]: bibliographic projection of a study
*/

use crate::error::OdysseyDataError;
use crate::records::{ClusterId, Pmid, Study};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Terminal node of a [`ClusterTree`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermLeaf {
    pub label: String,
    pub weight: f64,
}

/// Middle level of a [`ClusterTree`]. Never empty when produced by the assembler.
///
/// The cluster id travels as the label; deserializing parses it back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ClusterNodeWire")]
pub struct ClusterNode {
    pub label: String,
    #[serde(skip)]
    pub cluster_id: ClusterId,
    pub children: Vec<TermLeaf>,
}

impl ClusterNode {
    pub fn new(cluster_id: ClusterId, children: Vec<TermLeaf>) -> Self {
        Self {
            label: cluster_id.to_string(),
            cluster_id,
            children,
        }
    }

    pub fn total_weight(&self) -> f64 {
        self.children.iter().map(|leaf| leaf.weight).sum()
    }
}

#[derive(Deserialize)]
struct ClusterNodeWire {
    label: String,
    children: Vec<TermLeaf>,
}

impl TryFrom<ClusterNodeWire> for ClusterNode {
    type Error = OdysseyDataError;

    fn try_from(wire: ClusterNodeWire) -> Result<Self, Self::Error> {
        Ok(Self {
            cluster_id: wire.label.parse()?,
            label: wire.label,
            children: wire.children,
        })
    }
}

/// Root of the visualization hierarchy.
///
/// Serializes as `{label, children: [{label, children: [{label, weight}]}]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterTree {
    pub label: String,
    pub children: Vec<ClusterNode>,
}

impl ClusterTree {
    pub fn empty(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            children: Vec::new(),
        }
    }

    pub fn cluster_ids(&self) -> Vec<ClusterId> {
        self.children.iter().map(|c| c.cluster_id).collect()
    }

    pub fn leaf_count(&self) -> usize {
        self.children.iter().map(|c| c.children.len()).sum()
    }
}

/// Dense per-vertex values, index `i` belonging to mesh vertex `i`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IntensityMap {
    values: Vec<f64>,
}

impl IntensityMap {
    /// All-zero map of `vertex_count` entries ("clear" mode).
    pub fn zeros(vertex_count: usize) -> Self {
        Self {
            values: vec![0.0; vertex_count],
        }
    }

    pub fn from_values(values: Vec<f64>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn into_values(self) -> Vec<f64> {
        self.values
    }

    pub fn is_all_zero(&self) -> bool {
        self.values.iter().all(|v| *v == 0.0)
    }

    pub fn max_value(&self) -> f64 {
        self.values.iter().copied().fold(0.0, f64::max)
    }

    /// Number of vertices carrying a non-zero value.
    pub fn active_vertices(&self) -> usize {
        self.values.iter().filter(|v| **v != 0.0).count()
    }

    /// Plain-text vertex data: one value per line, in index order.
    pub fn to_text(&self) -> String {
        let mut out = String::with_capacity(self.values.len() * 2);
        for value in &self.values {
            if *value == 0.0 {
                out.push_str("0\n");
            } else {
                // Writing into a String cannot fail
                let _ = writeln!(out, "{}", value);
            }
        }
        out
    }
}

/// Text reference for a study.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citation {
    pub pmid: Pmid,
    pub text: String,
}

impl From<&Study> for Citation {
    fn from(study: &Study) -> Self {
        let year = study
            .year
            .map(|y| y.to_string())
            .unwrap_or_else(|| "n.d.".to_string());
        let mut text = format!("{} ({}). {}.", study.authors, year, study.title);
        if !study.journal.is_empty() {
            text.push(' ');
            text.push_str(&study.journal);
            text.push('.');
        }
        if !study.doi.is_empty() {
            text.push_str(" doi:");
            text.push_str(&study.doi);
        }
        Citation {
            pmid: study.pmid,
            text,
        }
    }
}
