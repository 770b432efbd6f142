// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
# Odyssey Query

Request-path algorithms over a [`odyssey_store::Store`]:

- **Spatial resolution**: coordinate (with bounded radius widening), cluster
  mates, words and topics to study sets
- **Term aggregation**: ranked frequencies and thresholded words
- **Topic selection**: top clusters and their term associations
- **Tree assembly**: root -> cluster -> term hierarchy
- **Intensity mapping**: normalized dense per-vertex vectors

Every operation is a synchronous read with no shared mutable state, so
requests may run concurrently without coordination.
*/

pub mod citations;
pub mod engine;
pub mod error;
pub mod intensity;
pub mod spatial;
pub mod terms;
pub mod topics;
pub mod tree;

pub use citations::citations;
pub use engine::{QueryEngine, QuerySettings};
pub use error::{QueryError, QueryResult};
pub use intensity::{CancelFlag, IntensityMapper, IntensitySettings, IntensitySource};
pub use spatial::{SpatialResolver, SpatialSettings, MAX_WIDENING_STEPS};
pub use terms::{TermAggregate, TermAggregator, TermSettings};
pub use topics::TopicSelector;
pub use tree::{TreeAssembler, TreeRequest, TreeSettings};
