// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Study -> topic cluster assignment and its `pmid<TAB>cluster` file format.

use crate::error::{ClusteringError, ClusteringResult};
use odyssey_store::StudyClusterWriter;
use odyssey_structures::{ClusterId, Pmid};
use std::fmt::Write as _;
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudyClusterAssignment {
    entries: Vec<(Pmid, ClusterId)>,
}

/// Outcome of writing an assignment to a store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplySummary {
    pub updated: usize,
    /// Pmids the store does not know
    pub skipped: usize,
}

impl StudyClusterAssignment {
    /// Pair row-ordered labels with their pmids
    pub fn from_labels(pmids: &[Pmid], labels: &[usize]) -> ClusteringResult<Self> {
        if pmids.len() != labels.len() {
            return Err(ClusteringError::Parse {
                line: 0,
                message: format!("{} pmids but {} labels", pmids.len(), labels.len()),
            });
        }
        let mut entries = Vec::with_capacity(pmids.len());
        for (pmid, label) in pmids.iter().zip(labels) {
            let cluster = u32::try_from(*label).map_err(|_| ClusteringError::Parse {
                line: 0,
                message: format!("cluster label {} out of range", label),
            })?;
            entries.push((*pmid, ClusterId::from(cluster)));
        }
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[(Pmid, ClusterId)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cluster_of(&self, pmid: Pmid) -> Option<ClusterId> {
        self.entries
            .iter()
            .find(|(p, _)| *p == pmid)
            .map(|(_, c)| *c)
    }

    pub fn to_tsv(&self) -> String {
        let mut out = String::new();
        for (pmid, cluster) in &self.entries {
            let _ = writeln!(out, "{}\t{}", pmid, cluster);
        }
        out
    }

    pub fn parse_tsv(text: &str) -> ClusteringResult<Self> {
        let mut entries = Vec::new();
        for (index, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let mut fields = line.split('\t').map(str::trim);
            let (Some(pmid), Some(cluster)) = (fields.next(), fields.next()) else {
                return Err(ClusteringError::Parse {
                    line: index + 1,
                    message: "expected 'pmid<TAB>cluster'".to_string(),
                });
            };
            let pmid: Pmid = pmid.parse().map_err(|e| ClusteringError::Parse {
                line: index + 1,
                message: format!("{}", e),
            })?;
            let cluster: ClusterId = cluster.parse().map_err(|e| ClusteringError::Parse {
                line: index + 1,
                message: format!("{}", e),
            })?;
            entries.push((pmid, cluster));
        }
        Ok(Self { entries })
    }

    pub fn write(&self, path: &Path) -> ClusteringResult<()> {
        std::fs::write(path, self.to_tsv())?;
        info!(
            target: "odyssey-clustering",
            "Wrote {} assignments to {}",
            self.len(),
            path.display()
        );
        Ok(())
    }

    pub fn read(path: &Path) -> ClusteringResult<Self> {
        Self::parse_tsv(&std::fs::read_to_string(path)?)
    }

    /// Store every assignment as the study's topic cluster
    pub fn apply(&self, writer: &dyn StudyClusterWriter) -> ClusteringResult<ApplySummary> {
        let mut summary = ApplySummary::default();
        for (pmid, cluster) in &self.entries {
            if writer.set_study_cluster(*pmid, Some(*cluster))? {
                summary.updated += 1;
            } else {
                summary.skipped += 1;
            }
        }
        if summary.skipped > 0 {
            warn!(
                target: "odyssey-clustering",
                "{} assignments referenced unknown studies",
                summary.skipped
            );
        }
        info!(
            target: "odyssey-clustering",
            "Applied {} study cluster assignments",
            summary.updated
        );
        Ok(summary)
    }
}
