// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Visualization service implementation.

Intensity maps are the most expensive payload: construction runs on the
blocking pool under the configured time bound. On timeout, or when the
caller drops the request, the worker is signalled through its
[`CancelFlag`] and stops at its next check.
*/

use super::{run_blocking, with_default_radius};
use crate::traits::VisualizationService;
use crate::types::*;
use async_trait::async_trait;
use odyssey_query::{CancelFlag, IntensitySource, QueryEngine, TreeRequest};
use odyssey_structures::{ClusterTree, IntensityMap};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Cancels the worker when the request future goes away
struct CancelOnDrop(CancelFlag);

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        self.0.cancel();
    }
}

/// Default implementation of VisualizationService
pub struct VisualizationServiceImpl {
    engine: Arc<QueryEngine>,
    default_radius: f64,
    request_timeout: Duration,
}

impl VisualizationServiceImpl {
    pub fn new(engine: Arc<QueryEngine>, default_radius: f64, request_timeout: Duration) -> Self {
        Self {
            engine,
            default_radius,
            request_timeout,
        }
    }
}

#[async_trait]
impl VisualizationService for VisualizationServiceImpl {
    async fn tree(&self, request: TreeRequest) -> ServiceResult<ClusterTree> {
        debug!(target: "odyssey-services", "Building tree for {}", request.root_label());

        let request = with_default_radius(request, self.default_radius);
        let engine = self.engine.clone();
        run_blocking(move || Ok(engine.tree_for(&request)?)).await
    }

    async fn intensity(&self, source: IntensitySource) -> ServiceResult<IntensityMap> {
        debug!(target: "odyssey-services", "Building intensity map for {:?}", source);

        let cancel = CancelFlag::new();
        let _cancel_on_drop = CancelOnDrop(cancel.clone());
        let engine = self.engine.clone();
        let worker = tokio::task::spawn_blocking(move || engine.intensity_map(&source, &cancel));

        match tokio::time::timeout(self.request_timeout, worker).await {
            Ok(joined) => {
                let map = joined
                    .map_err(|e| ServiceError::Internal(format!("Worker task failed: {}", e)))??;
                Ok(map)
            }
            Err(_) => {
                let ms = u64::try_from(self.request_timeout.as_millis()).unwrap_or(u64::MAX);
                warn!(target: "odyssey-services", "Intensity map timed out after {} ms", ms);
                Err(ServiceError::Timeout(ms))
            }
        }
    }

    async fn intensity_text(&self, source: IntensitySource) -> ServiceResult<String> {
        Ok(self.intensity(source).await?.to_text())
    }
}
