// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use odyssey_store::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClusteringError {
    #[error("Line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Term matrix has no rows or no columns")]
    EmptyMatrix,

    #[error("Cannot reduce to {dims} dimensions (at most {max})")]
    InvalidDimensions { dims: usize, max: usize },

    #[error("Cannot form {k} clusters from {rows} rows")]
    InvalidK { k: usize, rows: usize },

    /// The operator did not pick a cluster count
    #[error("No cluster count was selected")]
    NoSelection,

    #[error("A clustering run is already in progress")]
    Busy,

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type ClusteringResult<T> = Result<T, ClusteringError>;
