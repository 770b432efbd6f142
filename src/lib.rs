// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Brain Odyssey
//!
//! Coordinate and term driven aggregation of published neuroimaging studies.
//! Given a brain coordinate, a study, a word or a topic cluster, Odyssey
//! resolves the matching studies, ranks the terms they use, groups those
//! terms by topic cluster and produces the payloads behind the
//! circle-packing view (a cluster tree) and the surface view (a per-vertex
//! intensity map). An offline pipeline assigns every study to a topic
//! cluster.
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! odyssey = "0.1"  # Default: services + clustering
//! ```
//!
//! ## Feature Flags
//!
//! - **`services`** (default): async, transport-agnostic service layer
//! - **`clustering`** (default): offline SVD + k-means pipeline and the
//!   `compute_clusters` tool
//! - **`file-logging`**: rolling log files next to console output
//!
//! ## Usage
//!
//! ```rust,no_run
//! use odyssey::prelude::*;
//! use std::sync::Arc;
//!
//! let store = InMemoryStore::open();
//! // ... load locations, studies, activations, terms and clusters
//! let engine = QueryEngine::new(Arc::new(store), QuerySettings::default());
//! let tree = engine.tree_for(&TreeRequest::Word { word: "pain".into() })?;
//! println!("{}", serde_json::to_string(&tree)?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Foundation: odyssey-structures, odyssey-config         │
//! │  (records, ids, payloads, configuration)                │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Infrastructure: odyssey-store, odyssey-observability   │
//! │  (Store trait + in-memory store, logging)               │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Algorithms: odyssey-query, odyssey-clustering          │
//! │  (resolution, terms, topics, trees, intensity, k-means) │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Services: odyssey-services                             │
//! │  (async boundary for transport adapters)                │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## License
//!
//! Apache-2.0

// Re-export foundation
pub use odyssey_config as config;
pub use odyssey_structures as structures;

// Re-export infrastructure
pub use odyssey_observability as observability;
pub use odyssey_store as store;

// Re-export algorithms
pub use odyssey_query as query;

#[cfg(feature = "clustering")]
pub use odyssey_clustering as clustering;

// Re-export service layer
#[cfg(feature = "services")]
pub use odyssey_services as services;

/// Prelude - commonly used types and traits
pub mod prelude {
    pub use crate::structures::{
        Citation, ClusterId, ClusterTree, Coordinate, IntensityMap, Location, LocationId, Pmid,
        Study, StudyTerm,
    };

    pub use crate::store::{InMemoryStore, Store, StoreError, StudyClusterWriter};

    pub use crate::query::{
        CancelFlag, IntensitySource, QueryEngine, QueryError, QuerySettings, TreeRequest,
    };

    pub use crate::config::OdysseyConfig;

    #[cfg(feature = "clustering")]
    pub use crate::clustering::{
        ClusteringPipeline, ClusteringSettings, ElbowReport, StudyClusterAssignment, TermMatrix,
    };

    #[cfg(feature = "services")]
    pub use crate::services::{
        ClusteringService, ServiceError, ServiceRegistry, ServiceSettings, StudyService,
        TopicService, VisualizationService,
    };
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_facade_imports() {
        use crate::prelude::*;
        let pmid = Pmid::from(16990015);
        assert_eq!(pmid.to_string(), "16990015");
    }
}
