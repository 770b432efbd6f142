// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
# Odyssey Service Layer

Stable, transport-agnostic boundary between adapters (HTTP, CLI, embedded
viewers) and the query and clustering layers.

## Architecture

```text
┌─────────────────────────────────────────────────────────┐
│              TRANSPORT ADAPTERS                          │
│        HTTP handlers │ CLI tools │ embedded viewers      │
└────────────────────────┬────────────────────────────────┘
                         │
┌────────────────────────▼────────────────────────────────┐
│              SERVICE LAYER (this crate)                  │
│  StudyService │ TopicService │ VisualizationService      │
│  ClusteringService                                       │
│  - transport-agnostic DTOs and ServiceError              │
│  - blocking pool, per-request time bound, cancellation   │
└────────────────────────┬────────────────────────────────┘
                         │
┌────────────────────────▼────────────────────────────────┐
│              DOMAIN LAYER                                │
│  odyssey-query (QueryEngine) │ odyssey-clustering        │
│                  odyssey-store (Store)                   │
└─────────────────────────────────────────────────────────┘
```

## Errors

Domain outcomes (empty region, unknown study, inconsistent cluster data, no
activation data) arrive as [`ServiceError`] variants for which
[`ServiceError::is_domain`] is true; adapters render them as an empty or
explanatory payload rather than a failure.

## Usage

```rust,ignore
let registry = ServiceRegistry::from_config(store, &config);
let tree = registry
    .visualization
    .tree(TreeRequest::Word { word: "pain".into() })
    .await?;
```
*/

pub mod impls;
pub mod registry;
pub mod traits;
pub mod types;

// Re-export main API
pub use traits::{ClusteringService, StudyService, TopicService, VisualizationService};

pub use types::{
    // DTOs
    ClusteringRunSummary, ElbowRow, ElbowSummary, RankedTerm, TermRanking,
    VarianceProfileEntry, WordClusterPair, WordLocations,
    // Settings
    ServiceSettings,
    // Errors
    ServiceError, ServiceResult,
};

pub use registry::ServiceRegistry;

// Re-export implementations (optional - adapters can use their own)
pub use impls::{
    ClusteringServiceImpl, StudyServiceImpl, TopicServiceImpl, VisualizationServiceImpl,
};
