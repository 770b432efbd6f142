// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Store layer errors.

These are infrastructure failures. They propagate unmodified through the
query layer and are kept distinct from domain outcomes such as an empty
search region.
*/

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    /// The store was closed (or never opened) before the query ran
    #[error("Store is closed")]
    Closed,

    /// Connectivity problem with the backing store
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// The query itself failed
    #[error("Query failed: {0}")]
    Query(String),

    /// A write would violate a key or reference constraint
    #[error("Integrity violation: {0}")]
    Integrity(String),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;
