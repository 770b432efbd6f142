// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Default service implementations over the query and clustering layers.

Store reads and numeric work run on the blocking pool so a slow request
never stalls the async workers.
*/

pub mod clustering_service_impl;
pub mod study_service_impl;
pub mod topic_service_impl;
pub mod visualization_service_impl;

pub use clustering_service_impl::ClusteringServiceImpl;
pub use study_service_impl::StudyServiceImpl;
pub use topic_service_impl::TopicServiceImpl;
pub use visualization_service_impl::VisualizationServiceImpl;

use crate::types::{ServiceError, ServiceResult};
use odyssey_query::TreeRequest;

/// Run `work` on the blocking pool and flatten its result
pub(crate) async fn run_blocking<T, F>(work: F) -> ServiceResult<T>
where
    F: FnOnce() -> ServiceResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| ServiceError::Internal(format!("Worker task failed: {}", e)))?
}

/// Fill in `default_radius` for location requests that do not name one
pub(crate) fn with_default_radius(request: TreeRequest, default_radius: f64) -> TreeRequest {
    match request {
        TreeRequest::Location {
            x,
            y,
            z,
            radius: None,
        } => TreeRequest::Location {
            x,
            y,
            z,
            radius: Some(default_radius),
        },
        other => other,
    }
}
