// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Service layer error types.

Transport-agnostic errors that adapters map to their own status codes.
Domain outcomes (see [`ServiceError::is_domain`]) are expected answers to a
request and should be rendered as an empty or explanatory payload; the rest
are failures of the service itself.
*/

use odyssey_clustering::ClusteringError;
use odyssey_query::QueryError;
use odyssey_store::StoreError;
use thiserror::Error;

/// Service layer errors (transport-agnostic)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ServiceError {
    /// Resource not found (404 in HTTP)
    #[error("Not found: {resource} with id '{id}'")]
    NotFound { resource: String, id: String },

    /// Radius search exhausted without a study
    #[error("Empty region: {0}")]
    EmptyRegion(String),

    /// Stored data contradicts itself (e.g. a cluster without its terms)
    #[error("Data inconsistency: {0}")]
    DataInconsistency(String),

    /// Nothing to compute from
    #[error("No data: {0}")]
    NoData(String),

    /// Invalid input parameters (400 in HTTP)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Request exceeded its time bound
    #[error("Timed out after {0} ms")]
    Timeout(u64),

    #[error("Request was cancelled")]
    Cancelled,

    /// Exclusive resource already held (409 in HTTP)
    #[error("Busy: {0}")]
    Busy(String),

    /// Store or I/O failure
    #[error("Backend error: {0}")]
    Backend(String),

    /// Internal service error (500 in HTTP)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// True for recoverable request outcomes, false for service failures
    pub fn is_domain(&self) -> bool {
        matches!(
            self,
            ServiceError::NotFound { .. }
                | ServiceError::EmptyRegion(_)
                | ServiceError::DataInconsistency(_)
                | ServiceError::NoData(_)
                | ServiceError::InvalidInput(_)
        )
    }
}

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

// ============================================================================
// ERROR CONVERSIONS FROM BACKEND
// ============================================================================

impl From<QueryError> for ServiceError {
    fn from(err: QueryError) -> Self {
        match err {
            QueryError::EmptyRegion { .. } => ServiceError::EmptyRegion(err.to_string()),
            QueryError::StudyNotFound(pmid) => ServiceError::NotFound {
                resource: "Study".to_string(),
                id: pmid.to_string(),
            },
            QueryError::InconsistentClusterData { .. } => {
                ServiceError::DataInconsistency(err.to_string())
            }
            QueryError::NoActivationData => ServiceError::NoData(err.to_string()),
            QueryError::InvalidParameters(msg) => ServiceError::InvalidInput(msg),
            QueryError::Cancelled => ServiceError::Cancelled,
            QueryError::Store(e) => e.into(),
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        ServiceError::Backend(err.to_string())
    }
}

impl From<ClusteringError> for ServiceError {
    fn from(err: ClusteringError) -> Self {
        match err {
            ClusteringError::Busy => ServiceError::Busy(err.to_string()),
            ClusteringError::Io(_) => ServiceError::Backend(err.to_string()),
            ClusteringError::Store(e) => e.into(),
            ClusteringError::Parse { .. }
            | ClusteringError::EmptyMatrix
            | ClusteringError::InvalidDimensions { .. }
            | ClusteringError::InvalidK { .. }
            | ClusteringError::NoSelection => ServiceError::InvalidInput(err.to_string()),
        }
    }
}
