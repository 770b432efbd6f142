// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Domain errors of the query layer.

The first four variants are recoverable request outcomes. [`QueryError::Store`]
wraps infrastructure failures unmodified.
*/

use odyssey_store::StoreError;
use odyssey_structures::{ClusterId, Coordinate, OdysseyDataError, Pmid};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    /// Radius search reached its cap without finding a study
    #[error("No activations within {max_radius} of ({center})")]
    EmptyRegion { center: Coordinate, max_radius: f64 },

    /// Unknown pmid, or a study without a topic cluster
    #[error("Study not found or not clustered: {0}")]
    StudyNotFound(Pmid),

    /// A selected cluster has no matching leaf
    #[error("Cluster {cluster} was selected but none of the query terms belong to it")]
    InconsistentClusterData { cluster: ClusterId },

    /// Nothing to normalize against
    #[error("No activation data for the requested source")]
    NoActivationData,

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Request was cancelled")]
    Cancelled,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl QueryError {
    /// True for request outcomes, false for infrastructure failures
    pub fn is_domain(&self) -> bool {
        !matches!(self, QueryError::Store(_))
    }
}

impl From<OdysseyDataError> for QueryError {
    fn from(e: OdysseyDataError) -> Self {
        QueryError::InvalidParameters(e.to_string())
    }
}

pub type QueryResult<T> = Result<T, QueryError>;
