// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Service trait definitions.

These traits define the stable application boundary between
transport adapters and the query and clustering layers.
*/

pub mod clustering_service;
pub mod study_service;
pub mod topic_service;
pub mod visualization_service;

// Re-export for convenience
pub use clustering_service::ClusteringService;
pub use study_service::StudyService;
pub use topic_service::TopicService;
pub use visualization_service::VisualizationService;
