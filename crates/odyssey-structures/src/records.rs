// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Keyed records of the study corpus.

Pure data definitions - no business logic. Relationships between records
are expressed by id only; joins live in the store.
*/

use crate::coordinate::Coordinate;
use crate::{define_index, OdysseyDataError};
use serde::{Deserialize, Serialize};

define_index!(
    Pmid,
    u32,
    "PubMed identifier of a study. Primary key of the study table."
);

define_index!(
    LocationId,
    u32,
    "Identifier of a location. Ids below the mesh vertex count double as the
surface-mesh vertex index used by intensity maps."
);

define_index!(
    ClusterId,
    u32,
    "Identifier of a topic cluster (a small integer)."
);

/// An individual pinpoint location in the brain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub location_id: LocationId,
    pub coordinate: Coordinate,
    pub label: Option<String>,
    /// Coordinate space (`MNI`, `TAL`), when known
    pub space: Option<String>,
}

impl Location {
    pub fn new(location_id: LocationId, coordinate: Coordinate) -> Self {
        Self {
            location_id,
            coordinate,
            label: None,
            space: None,
        }
    }

    pub fn with_space(mut self, space: impl Into<String>) -> Self {
        self.space = Some(space.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// A published study.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Study {
    pub pmid: Pmid,
    pub doi: String,
    pub title: String,
    pub authors: String,
    pub year: Option<u16>,
    pub journal: String,
    /// Topic cluster assigned by the offline clustering pipeline
    pub study_cluster: Option<ClusterId>,
}

impl Study {
    pub fn new(pmid: Pmid) -> Self {
        Self {
            pmid,
            ..Default::default()
        }
    }
}

/// Peak activation reported by a study at a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Activation {
    pub pmid: Pmid,
    pub location_id: LocationId,
}

/// A term extracted from study text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Term {
    pub word: String,
}

/// Relative frequency (0-1) with which a study mentions a term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyTerm {
    pub word: String,
    pub pmid: Pmid,
    pub frequency: f64,
}

impl StudyTerm {
    pub fn new(
        word: impl Into<String>,
        pmid: Pmid,
        frequency: f64,
    ) -> Result<Self, OdysseyDataError> {
        if !(0.0..=1.0).contains(&frequency) {
            return Err(OdysseyDataError::FrequencyOutOfRange(frequency));
        }
        Ok(Self {
            word: word.into(),
            pmid,
            frequency,
        })
    }
}

/// A topic cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cluster {
    pub cluster_id: ClusterId,
}

/// Membership of a term in a topic cluster.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TermCluster {
    pub word: String,
    pub cluster_id: ClusterId,
}
