// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
# Odyssey Store

Persistence boundary for the study corpus.

The query layer depends only on the [`Store`] trait; [`InMemoryStore`] is the
bundled implementation used by tools and tests. Every call is an independent
read against current state, and closing a store makes further calls fail
with [`StoreError::Closed`].
*/

pub mod error;
pub mod memory;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use memory::{InMemoryStore, StoreStats};
pub use traits::{Store, StudyClusterWriter};
